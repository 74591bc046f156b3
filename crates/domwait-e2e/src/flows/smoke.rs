//! Smoke scenario: the cheapest possible end-to-end proof that the driver,
//! the browser, and the network path all work. Runs against a static page.

use std::sync::Arc;

use domwait::{Driver, Error, Locator, Result, Session};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct SmokeParams {
    pub url: String,
    pub title_fragment: String,
}

impl From<&Config> for SmokeParams {
    fn from(config: &Config) -> Self {
        Self {
            url: config.smoke_url.clone(),
            title_fragment: config.smoke_title.clone(),
        }
    }
}

pub async fn run<D: Driver>(session: Arc<Session<D>>, params: SmokeParams) -> Result<()> {
    session.goto(&params.url).await?;

    // Any rendered body content counts as "loaded".
    let ready = [Locator::css("h1"), Locator::css("body *")];
    session
        .locate_any(&ready, session.wait_spec().timeout)
        .await?;

    let title = session.title().await?;
    if !title.contains(&params.title_fragment) {
        return Err(Error::Assertion(format!(
            "expected page title to contain {:?}, got {:?}",
            params.title_fragment, title
        )));
    }
    tracing::info!(%title, "smoke page reachable");
    Ok(())
}
