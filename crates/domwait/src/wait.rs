// Wait engine - bounded, fixed-interval DOM polling
//
// Every wait in the engine is the same loop: probe, check, sleep, repeat
// until the deadline. Fixed-interval polling (no exponential backoff) is
// deliberate: UI state changes are typically sub-second and each wait is
// bounded by a generous absolute timeout, so adaptive backoff buys nothing.

use crate::driver::{DomElement, Driver};
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::session::Session;
use std::time::{Duration, Instant};

/// Default timeout applied when a wait does not pass its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Parameters for a bounded wait: how long to keep trying, and how often.
///
/// The only invariant is `timeout > 0`; both fields are tuning values, not
/// design constraints, and belong in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSpec {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitSpec {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        debug_assert!(!timeout.is_zero(), "wait timeout must be positive");
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl<D: Driver> Session<D> {
    /// Polls until an element satisfying `locator` exists in the DOM.
    ///
    /// Transient absence before the deadline is expected, not exceptional;
    /// the wait only fails once `timeout` elapses with no match.
    pub async fn locate(&self, locator: &Locator, timeout: Duration) -> Result<D::Element> {
        self.locate_inner(locator, timeout, false).await
    }

    /// As [`Session::locate`], additionally requiring the element to be
    /// rendered visible (nonzero size), not just present in the tree.
    pub async fn locate_visible(&self, locator: &Locator, timeout: Duration) -> Result<D::Element> {
        self.locate_inner(locator, timeout, true).await
    }

    /// Polls like [`Session::locate`] but treats absence as a valid outcome.
    ///
    /// Returns `Ok(None)` when nothing matched within `timeout`; only driver
    /// transport failures surface as errors. This is the engine's shape for
    /// optional UI elements; the "step may not be needed" contract lives in
    /// the return type instead of a swallowed exception.
    pub async fn try_locate(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<D::Element>> {
        match self.locate_inner(locator, timeout, true).await {
            Ok(element) => Ok(Some(element)),
            Err(Error::Timeout { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Polls all candidates round-robin until one matches, under one shared
    /// budget. Returns the first element found; the candidate order decides
    /// ties within a single poll iteration.
    pub async fn locate_any(
        &self,
        candidates: &[Locator],
        budget: Duration,
    ) -> Result<D::Element> {
        let start = Instant::now();
        loop {
            for locator in candidates {
                if let Some(element) = self.probe(locator, false).await? {
                    return Ok(element);
                }
            }
            if start.elapsed() >= budget {
                return Err(Error::AllCandidatesFailed {
                    candidates: candidates.iter().map(Locator::describe).collect(),
                    budget,
                });
            }
            tokio::time::sleep(self.wait_spec().poll_interval).await;
        }
    }

    /// Polls the session's window-handle set until it grows strictly beyond
    /// `baseline` handles, then returns the newest handle.
    ///
    /// Models external popups (wallet-confirmation windows) that appear
    /// asynchronously outside the controlled page's DOM. A flow that opens
    /// zero new windows times out here rather than false-positiving on a
    /// pre-existing handle.
    pub async fn switch_to_new_window(
        &self,
        baseline: usize,
        timeout: Duration,
    ) -> Result<String> {
        let start = Instant::now();
        loop {
            let handles = self.window_handles().await?;
            if handles.len() > baseline {
                // Newest handle is the one past the baseline.
                let handle = handles[baseline].clone();
                tracing::debug!(%handle, total = handles.len(), "new window detected");
                self.switch_to_window(&handle).await?;
                return Ok(handle);
            }
            if start.elapsed() >= timeout {
                return Err(Error::timeout(
                    format!("a window beyond the {} already open", baseline),
                    timeout,
                ));
            }
            tokio::time::sleep(self.wait_spec().poll_interval).await;
        }
    }

    async fn locate_inner(
        &self,
        locator: &Locator,
        timeout: Duration,
        require_visible: bool,
    ) -> Result<D::Element> {
        let start = Instant::now();
        loop {
            if let Some(element) = self.probe(locator, require_visible).await? {
                return Ok(element);
            }
            if start.elapsed() >= timeout {
                let what = if require_visible {
                    format!("visible {}", locator.describe())
                } else {
                    locator.describe()
                };
                tracing::debug!(%locator, ?timeout, "locate timed out");
                return Err(Error::timeout(what, timeout));
            }
            tokio::time::sleep(self.wait_spec().poll_interval).await;
        }
    }

    /// Single non-waiting probe: the first match, filtered for visibility
    /// when required.
    pub(crate) async fn probe(
        &self,
        locator: &Locator,
        require_visible: bool,
    ) -> Result<Option<D::Element>> {
        let matches = self.driver().find_all(locator).await?;
        if !require_visible {
            return Ok(matches.into_iter().next());
        }
        for element in matches {
            if element.is_displayed().await? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }
}
