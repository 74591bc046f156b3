//! domwait: a resilient DOM-polling interaction engine for WebDriver sessions
//!
//! Browser UIs render asynchronously; scripts that drive them need every
//! lookup to be a bounded, retryable wait rather than a one-shot query.
//! This crate is that loop, written once: locate elements by predicate,
//! wait for existence or visibility under a timeout, act (click, type,
//! hover, switch window), and fall back through alternate locators under a
//! single shared time budget.
//!
//! # Example
//!
//! ```ignore
//! use domwait::{expect, Locator, Session, WebDriverBackend};
//! use std::time::Duration;
//! use thirtyfour::{DesiredCapabilities, WebDriver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let caps = DesiredCapabilities::chrome();
//!     let driver = WebDriver::new("http://localhost:9515", caps).await?;
//!     let session = Session::new(WebDriverBackend::new(driver));
//!
//!     session.goto("https://app.example").await?;
//!
//!     // Fallback locators share one ten-second budget.
//!     session
//!         .click_first_match(
//!             &[Locator::text("Actions"), Locator::text("ACTIONS")],
//!             Duration::from_secs(10),
//!         )
//!         .await?;
//!
//!     session
//!         .type_into(&Locator::css("input[type=\"number\"]"), "10000")
//!         .await?;
//!
//!     expect(&session, Locator::css("div.balance"))
//!         .to_have_numeric_value_near(10_000.0, 200.0)
//!         .await?;
//!
//!     session.quit().await?;
//!     Ok(())
//! }
//! ```
//!
//! The engine talks to the browser through the [`Driver`] trait seam.
//! Production uses [`WebDriverBackend`] over thirtyfour; tests use the
//! scripted in-memory driver in [`mock`].

mod actions;
mod assertions;
mod driver;
mod error;
mod locator;
mod session;
mod value;
mod wait;
mod webdriver;

pub mod mock;

// Re-export error types
pub use error::{Error, Result};

// Re-export the driver seam
pub use driver::{DomElement, Driver};

// Re-export the session and wait configuration
pub use session::{Session, DEFAULT_SETTLE};
pub use wait::{WaitSpec, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};

// Re-export locators and sanitizers
pub use locator::{strip_wrapping_quotes, xpath_literal, Locator};

// Re-export assertions API
pub use assertions::{expect, Expectation};

// Re-export lenient numeric extraction
pub use value::extract_numeric_value;

// Re-export the production backend
pub use webdriver::{WebDriverBackend, WebDriverElement};
