// Assertions - auto-retry expectations over locators
//
// An expectation re-probes the DOM until the condition holds or the timeout
// elapses. Absence of the element during polling counts as "not yet", not
// as an error; the DOM is allowed to catch up.

use crate::driver::{DomElement, Driver};
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::session::Session;
use crate::value::extract_numeric_value;
use std::time::{Duration, Instant};

/// Default timeout for assertions.
const DEFAULT_ASSERTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default polling interval for assertions.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Creates an auto-retrying expectation for a locator.
///
/// ```ignore
/// expect(&session, Locator::text("Balance"))
///     .with_timeout(Duration::from_secs(10))
///     .to_contain_text("sdCRV")
///     .await?;
/// ```
pub fn expect<D: Driver>(session: &Session<D>, locator: Locator) -> Expectation<'_, D> {
    Expectation::new(session, locator)
}

/// Expectation wraps a session and locator and provides assertion methods
/// with auto-retry.
pub struct Expectation<'a, D: Driver> {
    session: &'a Session<D>,
    locator: Locator,
    timeout: Duration,
    poll_interval: Duration,
    negate: bool,
}

// to_* methods consume self; the builder chain reads like the assertion it
// performs, so the usual self-convention lint does not apply.
#[allow(clippy::wrong_self_convention)]
impl<'a, D: Driver> Expectation<'a, D> {
    pub(crate) fn new(session: &'a Session<D>, locator: Locator) -> Self {
        Self {
            session,
            locator,
            timeout: DEFAULT_ASSERTION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            negate: false,
        }
    }

    /// Sets a custom timeout for this assertion.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a custom poll interval for this assertion.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Negates the assertion.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Asserts that a matching element exists in the DOM.
    pub async fn to_be_present(self) -> Result<()> {
        self.retry("be present", |observed| observed.is_some(), false)
            .await
            .map(|_| ())
    }

    /// Asserts that a matching element exists and is rendered visible.
    pub async fn to_be_visible(self) -> Result<()> {
        self.retry("be visible", |observed| observed.is_some(), true)
            .await
            .map(|_| ())
    }

    /// Asserts on the element's exact text (trimmed before comparison).
    pub async fn to_have_text(self, expected: &str) -> Result<()> {
        let expected = expected.trim().to_string();
        let what = format!("have text '{}'", expected);
        self.retry(
            &what,
            move |observed| observed.as_deref().map(str::trim) == Some(expected.as_str()),
            false,
        )
        .await
        .map(|_| ())
    }

    /// Asserts that the element's text contains the substring.
    pub async fn to_contain_text(self, expected: &str) -> Result<()> {
        let expected = expected.to_string();
        let what = format!("contain text '{}'", expected);
        self.retry(
            &what,
            move |observed| observed.as_deref().is_some_and(|t| t.contains(&expected)),
            false,
        )
        .await
        .map(|_| ())
    }

    /// Asserts that the element's text parses to a number within `tolerance`
    /// of `expected` under the engine's lenient numeric extraction.
    pub async fn to_have_numeric_value_near(self, expected: f64, tolerance: f64) -> Result<()> {
        let what = format!("show a value within {} of {}", tolerance, expected);
        self.retry(
            &what,
            move |observed| {
                observed
                    .as_deref()
                    .is_some_and(|t| (extract_numeric_value(t) - expected).abs() <= tolerance)
            },
            false,
        )
        .await
        .map(|_| ())
    }

    /// Core retry loop shared by every assertion.
    ///
    /// `observed` is `None` while no element matches; `check` decides whether
    /// the current observation satisfies the (possibly negated) condition.
    async fn retry<F>(
        self,
        what: &str,
        check: F,
        require_visible: bool,
    ) -> Result<Option<String>>
    where
        F: Fn(&Option<String>) -> bool,
    {
        let start = Instant::now();

        loop {
            let observed = match self.session.probe(&self.locator, require_visible).await? {
                Some(element) => Some(element.text().await?),
                None => None,
            };

            let satisfied = check(&observed);
            let matches = if self.negate { !satisfied } else { satisfied };
            if matches {
                return Ok(observed);
            }

            if start.elapsed() >= self.timeout {
                let polarity = if self.negate { "NOT to" } else { "to" };
                let seen = match &observed {
                    Some(text) => format!("'{}'", text),
                    None => "no matching element".to_string(),
                };
                return Err(Error::Assertion(format!(
                    "expected {} {} {}, but observed {} after {:?}",
                    self.locator.describe(),
                    polarity,
                    what,
                    seen,
                    self.timeout
                )));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expectation_defaults() {
        assert_eq!(DEFAULT_ASSERTION_TIMEOUT, Duration::from_secs(5));
        assert_eq!(DEFAULT_POLL_INTERVAL, Duration::from_millis(100));
    }
}
