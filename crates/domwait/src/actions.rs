// Actions - locate-then-act operations with fallback and budgeting
//
// These are the verbs the flows are written in. Each one re-locates its
// target inside the call so stale element handles never cross an await
// point that may re-render the page.

use crate::driver::{DomElement, Driver};
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::session::Session;
use std::time::{Duration, Instant};

impl<D: Driver> Session<D> {
    /// Tries candidate locators in order, clicking the first that resolves.
    ///
    /// All candidates share one time budget: elapsed time is deducted after
    /// each failed attempt and the next candidate only gets what remains.
    /// This bounds total wall-clock time by `budget` regardless of how many
    /// candidates are supplied; a fresh timeout per candidate would not.
    /// Each attempt is granted an even share of what remains (the last one
    /// gets everything left), so an absent first candidate cannot starve the
    /// rest of the list while the overall bound stays strict.
    pub async fn click_first_match(&self, candidates: &[Locator], budget: Duration) -> Result<()> {
        let start = Instant::now();
        let total = candidates.len();
        for (index, locator) in candidates.iter().enumerate() {
            let elapsed = start.elapsed();
            if elapsed >= budget {
                break;
            }
            let remaining = budget - elapsed;
            let attempt = if index + 1 == total {
                remaining
            } else {
                (remaining / (total - index) as u32)
                    .max(self.wait_spec().poll_interval)
                    .min(remaining)
            };
            match self.locate_and_click(locator, attempt).await {
                Ok(()) => {
                    tracing::debug!(%locator, "clicked");
                    return Ok(());
                }
                Err(err) if err.is_timeout() => {
                    tracing::debug!(%locator, "candidate did not resolve, trying next");
                }
                Err(err) => return Err(err),
            }
        }
        tracing::warn!(?budget, "all click candidates exhausted");
        Err(Error::AllCandidatesFailed {
            candidates: candidates.iter().map(Locator::describe).collect(),
            budget,
        })
    }

    /// Best-effort click for optional UI elements.
    ///
    /// Returns `Ok(false)` when the element never appeared: "step not
    /// needed", not a failure. Driver transport errors still propagate.
    pub async fn click_if_present(&self, locator: &Locator, timeout: Duration) -> Result<bool> {
        match self.try_locate(locator, timeout).await? {
            Some(element) => {
                self.scroll_into_view(&element).await?;
                element.click().await?;
                tracing::debug!(%locator, "optional element clicked");
                Ok(true)
            }
            None => {
                tracing::debug!(%locator, "optional element absent, skipping");
                Ok(false)
            }
        }
    }

    /// Locates an input, replaces its content, and commits the value.
    ///
    /// The trailing tab-out shifts focus away so the change/blur listeners
    /// many UIs hang state updates on actually fire; raw `send_keys` alone
    /// leaves some frameworks believing the field is still being edited.
    pub async fn type_into(&self, locator: &Locator, text: &str) -> Result<()> {
        let element = self
            .locate_visible(locator, self.wait_spec().timeout)
            .await?;
        self.scroll_into_view(&element).await?;
        element.clear().await?;
        element.send_keys(text).await?;
        element.tab_out().await?;
        tracing::debug!(%locator, text, "typed and committed");
        Ok(())
    }

    /// As [`Session::type_into`], with ordered fallback input locators under
    /// one shared budget.
    pub async fn type_into_first_match(
        &self,
        candidates: &[Locator],
        budget: Duration,
        text: &str,
    ) -> Result<()> {
        let element = self.locate_any(candidates, budget).await?;
        self.scroll_into_view(&element).await?;
        element.clear().await?;
        element.send_keys(text).await?;
        element.tab_out().await?;
        Ok(())
    }

    /// Moves the pointer over the element without clicking, then settles.
    ///
    /// Required for hover-revealed controls (icons, tooltips): no click-based
    /// locator can find them before the hover happens. Returns the hovered
    /// element for a follow-up action.
    pub async fn hover(&self, locator: &Locator, timeout: Duration) -> Result<D::Element> {
        let element = self.locate_visible(locator, timeout).await?;
        self.driver().hover(&element).await?;
        tokio::time::sleep(self.settle()).await;
        Ok(element)
    }

    /// Hover variant for an element already in hand (e.g. during an icon
    /// scan where candidates come from a bulk `find_all`).
    pub async fn hover_element(&self, element: &D::Element) -> Result<()> {
        self.driver().hover(element).await?;
        tokio::time::sleep(self.settle()).await;
        Ok(())
    }

    /// Scrolls the element into view and waits a short fixed settle delay so
    /// layout or scroll animation finishes before the next action lands.
    pub async fn scroll_into_view(&self, element: &D::Element) -> Result<()> {
        element.scroll_into_view().await?;
        tokio::time::sleep(self.settle()).await;
        Ok(())
    }

    async fn locate_and_click(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        let element = self.locate_visible(locator, timeout).await?;
        self.scroll_into_view(&element).await?;
        element.click().await
    }
}
