// Session bootstrap - one-shot Chrome setup against a WebDriver endpoint
//
// The wallet-confirmation flows only work inside a real user profile that
// already carries the wallet extension, so the capability set reproduces
// that environment: explicit binary, user-data-dir/profile-directory, and
// the automation-banner switches suppressed.

use crate::config::Config;
use domwait::{Error, Result, Session, WaitSpec, WebDriverBackend};
use thirtyfour::{ChromeCapabilities, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};

fn init_err(err: impl std::fmt::Display) -> Error {
    Error::SessionInit(err.to_string())
}

fn build_capabilities(config: &Config) -> Result<ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();
    for arg in [
        "--start-maximized",
        "--disable-gpu",
        "--disable-dev-shm-usage",
        "--no-sandbox",
        "--disable-blink-features=AutomationControlled",
    ] {
        caps.add_arg(arg).map_err(init_err)?;
    }
    caps.add_experimental_option("excludeSwitches", serde_json::json!(["enable-automation"]))
        .map_err(init_err)?;

    if config.headless {
        caps.add_arg("--headless=new").map_err(init_err)?;
    }
    if let Some(binary) = &config.chrome_binary {
        caps.set_binary(binary).map_err(init_err)?;
    }
    if let Some(dir) = &config.user_data_dir {
        caps.add_arg(&format!("--user-data-dir={dir}")).map_err(init_err)?;
    }
    if let Some(profile) = &config.profile_dir {
        caps.add_arg(&format!("--profile-directory={profile}"))
            .map_err(init_err)?;
    }
    Ok(caps)
}

/// Creates a fresh browser session for one scenario.
///
/// Failure here is fatal for the whole run: nothing downstream can execute
/// without a session, so callers abort instead of continuing.
pub async fn chrome_session(config: &Config) -> Result<Session<WebDriverBackend>> {
    let caps = build_capabilities(config)?;
    tracing::info!(
        endpoint = %config.webdriver_url,
        binary = config.chrome_binary.as_deref().unwrap_or("(default)"),
        "starting Chrome session"
    );
    let driver = WebDriver::new(&config.webdriver_url, caps)
        .await
        .map_err(init_err)?;
    Ok(Session::new(WebDriverBackend::new(driver)).with_wait(
        WaitSpec::new()
            .with_timeout(config.step_timeout())
            .with_poll_interval(config.poll_interval()),
    ))
}
