//! The scenarios themselves. Each flow is an async fn taking the shared
//! session plus its own parameter struct, returning `domwait::Result<()>`.

pub mod deposit;
pub mod smoke;
pub mod wallet;
