// Session - explicit handle for one controlled browser instance
//
// The session replaces the process-wide driver global the flows used to
// share: every scenario receives its Session by reference, and teardown is
// a visible, single call instead of a hidden hook.

use crate::driver::Driver;
use crate::error::Result;
use crate::wait::WaitSpec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default settle delay after scrolls and hovers.
///
/// Pragmatic compensation for the lack of an animation-completion signal:
/// layout and reveal animations in the target UIs finish well inside this.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(150);

/// One running browser instance.
///
/// Owns the driver handle, the default [`WaitSpec`] applied to waits that do
/// not pass an explicit timeout, and the quit-once guard. Created at suite
/// start, destroyed at suite end, never reused across scenarios.
pub struct Session<D: Driver> {
    driver: D,
    wait: WaitSpec,
    settle: Duration,
    released: AtomicBool,
}

impl<D: Driver> Session<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            wait: WaitSpec::default(),
            settle: DEFAULT_SETTLE,
            released: AtomicBool::new(false),
        }
    }

    /// Sets the default wait parameters for this session.
    #[must_use]
    pub fn with_wait(mut self, wait: WaitSpec) -> Self {
        self.wait = wait;
        self
    }

    /// Sets the settle delay applied after scrolls and hovers.
    #[must_use]
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn wait_spec(&self) -> &WaitSpec {
        &self.wait
    }

    pub(crate) fn settle(&self) -> Duration {
        self.settle
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "navigating");
        self.driver.goto(url).await
    }

    pub async fn refresh(&self) -> Result<()> {
        tracing::debug!("refreshing page");
        self.driver.refresh().await
    }

    pub async fn title(&self) -> Result<String> {
        self.driver.title().await
    }

    pub async fn current_url(&self) -> Result<String> {
        self.driver.current_url().await
    }

    pub async fn window_handles(&self) -> Result<Vec<String>> {
        self.driver.window_handles().await
    }

    pub async fn current_window(&self) -> Result<String> {
        self.driver.current_window().await
    }

    pub async fn switch_to_window(&self, handle: &str) -> Result<()> {
        tracing::debug!(handle, "switching window");
        self.driver.switch_to_window(handle).await
    }

    /// Releases the browser.
    ///
    /// Idempotent: the first call quits the driver, later calls are no-ops.
    /// The scenario runner invokes this on every exit path, including after
    /// assertion failures and panics, so OS-level browser processes never
    /// leak.
    pub async fn quit(&self) -> Result<()> {
        if self.released.swap(true, Ordering::SeqCst) {
            tracing::debug!("session already released");
            return Ok(());
        }
        tracing::debug!("quitting browser session");
        self.driver.quit().await
    }

    /// True once [`Session::quit`] has run.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl<D: Driver> Drop for Session<D> {
    fn drop(&mut self) {
        if !self.is_released() {
            // Can't quit asynchronously from Drop; surface the leak instead.
            tracing::warn!("session dropped without quit(); browser process may leak");
        }
    }
}
