// Error types for the interaction engine

use std::time::Duration;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a browser session
#[derive(Debug, Error)]
pub enum Error {
    /// The browser session could not be created
    ///
    /// Fatal for the whole run: no scenario can execute without a session.
    /// Common causes: chromedriver not running, wrong endpoint URL, or a
    /// Chrome binary/profile path that does not exist.
    #[error("Failed to create browser session: {0}")]
    SessionInit(String),

    /// A bounded wait found nothing before its deadline
    ///
    /// Absence *before* the deadline is expected and never surfaces; this
    /// error means the full timeout elapsed with the predicate unsatisfied.
    #[error("Timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    /// Every fallback locator exhausted the shared time budget
    #[error("No candidate matched within {budget:?}: [{}]", candidates.join(", "))]
    AllCandidatesFailed {
        candidates: Vec<String>,
        budget: Duration,
    },

    /// A final observed value failed its expected-value check
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Error reported by the underlying WebDriver transport
    #[error("Driver error: {0}")]
    Driver(String),

    /// A selector string could not be used as given
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Convenience constructor for wait deadlines
    pub(crate) fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        Error::Timeout {
            what: what.into(),
            timeout,
        }
    }

    /// True for errors that a best-effort step may absorb
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Timeout { .. } | Error::AllCandidatesFailed { .. }
        )
    }
}
