//! Scenario harness for browser-driven end-to-end checks built on the
//! `domwait` interaction engine: configuration, Chrome bootstrap, the
//! scenario lifecycle, and the flows.
//!
//! The binary (`main.rs`) is a thin shell over this library so integration
//! tests can drive the same code paths against the scripted mock driver.

pub mod bootstrap;
pub mod config;
pub mod flows;
pub mod scenario;

pub use config::{Config, ScenarioKind};
pub use scenario::{run_scenario, Outcome, ScenarioReport};
