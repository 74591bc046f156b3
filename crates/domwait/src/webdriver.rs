// WebDriver backend - production implementation of the driver seam
//
// Thin mapping from the engine's traits onto thirtyfour. Everything the
// transport can report is flattened into `Error::Driver`; the wait engine
// owns timeout semantics, so no thirtyfour-level implicit waits are used.

use crate::driver::{DomElement, Driver};
use crate::error::{Error, Result};
use crate::locator::Locator;
use async_trait::async_trait;
use thirtyfour::error::WebDriverError;
use thirtyfour::{By, Key, WebDriver, WebElement, WindowHandle};

fn wd_err(err: WebDriverError) -> Error {
    Error::Driver(err.to_string())
}

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::Text(text) => By::XPath(Locator::text_xpath(text)),
        Locator::Css(selector) => By::Css(selector.clone()),
        Locator::XPath(expr) => By::XPath(expr.clone()),
        Locator::Attr { name, value } => By::Css(Locator::attr_css(name, value)),
    }
}

/// Driver over a live WebDriver session (chromedriver, Selenium, ...).
#[derive(Clone)]
pub struct WebDriverBackend {
    driver: WebDriver,
}

impl WebDriverBackend {
    pub fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    /// The underlying thirtyfour handle, for setup code that needs raw
    /// access (capability-dependent calls, screenshots).
    pub fn raw(&self) -> &WebDriver {
        &self.driver
    }
}

#[async_trait]
impl Driver for WebDriverBackend {
    type Element = WebDriverElement;

    async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await.map_err(wd_err)
    }

    async fn refresh(&self) -> Result<()> {
        self.driver.refresh().await.map_err(wd_err)
    }

    async fn current_url(&self) -> Result<String> {
        self.driver
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(wd_err)
    }

    async fn title(&self) -> Result<String> {
        self.driver.title().await.map_err(wd_err)
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>> {
        let elements = self.driver.find_all(to_by(locator)).await.map_err(wd_err)?;
        Ok(elements
            .into_iter()
            .map(|inner| WebDriverElement { inner })
            .collect())
    }

    async fn window_handles(&self) -> Result<Vec<String>> {
        let handles = self.driver.windows().await.map_err(wd_err)?;
        Ok(handles.iter().map(|handle| handle.to_string()).collect())
    }

    async fn current_window(&self) -> Result<String> {
        self.driver
            .window()
            .await
            .map(|handle| handle.to_string())
            .map_err(wd_err)
    }

    async fn switch_to_window(&self, handle: &str) -> Result<()> {
        self.driver
            .switch_to_window(WindowHandle::from(handle.to_string()))
            .await
            .map_err(wd_err)
    }

    async fn hover(&self, element: &Self::Element) -> Result<()> {
        self.driver
            .action_chain()
            .move_to_element_center(&element.inner)
            .perform()
            .await
            .map_err(wd_err)
    }

    async fn quit(&self) -> Result<()> {
        // thirtyfour's quit() consumes the handle; the session guarantees
        // this runs once, so quitting through a clone is safe.
        self.driver.clone().quit().await.map_err(wd_err)
    }
}

/// Element handle over a thirtyfour [`WebElement`].
#[derive(Clone)]
pub struct WebDriverElement {
    inner: WebElement,
}

#[async_trait]
impl DomElement for WebDriverElement {
    async fn click(&self) -> Result<()> {
        self.inner.click().await.map_err(wd_err)
    }

    async fn clear(&self) -> Result<()> {
        self.inner.clear().await.map_err(wd_err)
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.inner.send_keys(text).await.map_err(wd_err)
    }

    async fn tab_out(&self) -> Result<()> {
        self.inner.send_keys(Key::Tab + "").await.map_err(wd_err)
    }

    async fn text(&self) -> Result<String> {
        self.inner.text().await.map_err(wd_err)
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        self.inner.attr(name).await.map_err(wd_err)
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.inner.is_displayed().await.map_err(wd_err)
    }

    async fn scroll_into_view(&self) -> Result<()> {
        self.inner.scroll_into_view().await.map_err(wd_err)
    }
}
