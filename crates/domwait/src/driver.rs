// Driver seam - the trait boundary between the engine and the transport
//
// The engine never talks to a WebDriver client directly. Everything it needs
// from a browser fits behind these two traits, which keeps the polling,
// budgeting, and assertion logic testable against the scripted in-memory
// driver in `mock` while production runs over `WebDriverBackend`.

use crate::error::Result;
use crate::locator::Locator;
use async_trait::async_trait;

/// One controlled browser instance.
///
/// Implementations must serialize commands internally; the engine issues
/// operations strictly sequentially and never shares a driver across
/// sessions.
#[async_trait]
pub trait Driver: Send + Sync + 'static {
    /// Handle type for located elements; valid only until the DOM mutates.
    type Element: DomElement + Clone + Send + Sync;

    async fn goto(&self, url: &str) -> Result<()>;

    async fn refresh(&self) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    async fn title(&self) -> Result<String>;

    /// Returns every element currently matching the locator, possibly none.
    ///
    /// An empty result is not an error; the wait engine owns the decision of
    /// whether absence is acceptable.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>>;

    /// All window handles the session currently owns, in creation order.
    async fn window_handles(&self) -> Result<Vec<String>>;

    /// Handle of the currently focused window.
    async fn current_window(&self) -> Result<String>;

    async fn switch_to_window(&self, handle: &str) -> Result<()>;

    /// Moves the virtual pointer over the element without clicking.
    async fn hover(&self, element: &Self::Element) -> Result<()>;

    /// Releases the browser. Implementations must tolerate a single call;
    /// [`Session::quit`](crate::Session::quit) guarantees it is not repeated.
    async fn quit(&self) -> Result<()>;
}

/// A located element.
///
/// Callers must not cache these across awaited actions that may trigger a
/// re-render; re-locate instead.
#[async_trait]
pub trait DomElement: Send + Sync {
    async fn click(&self) -> Result<()>;

    async fn clear(&self) -> Result<()>;

    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Shifts focus away from the element (Tab key), firing the blur/change
    /// listeners many UIs rely on to commit an input value.
    async fn tab_out(&self) -> Result<()>;

    /// Visible text content, trimmed by the caller as needed.
    async fn text(&self) -> Result<String>;

    async fn attr(&self, name: &str) -> Result<Option<String>>;

    /// True when the element is rendered with nonzero size, not merely
    /// present in the DOM tree.
    async fn is_displayed(&self) -> Result<bool>;

    async fn scroll_into_view(&self) -> Result<()>;
}
