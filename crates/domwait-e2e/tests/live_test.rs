// Live-browser checks. Need a running chromedriver (WEBDRIVER_URL, default
// http://localhost:9515) and network access, so they are ignored by default:
//
//     cargo test -p domwait-e2e -- --ignored

use anyhow::Result;
use clap::Parser;
use domwait_e2e::flows::smoke::{self, SmokeParams};
use domwait_e2e::scenario::run_scenario;
use domwait_e2e::{bootstrap, Config};

#[tokio::test]
#[ignore = "requires chromedriver and network access"]
async fn live_smoke_page_loads() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("domwait=debug,domwait_e2e=debug")
        .try_init()
        .ok();

    let config = Config::try_parse_from(["domwait-e2e"])?;
    let session = bootstrap::chrome_session(&config).await?;
    let report = run_scenario("smoke", session, |s| {
        smoke::run(s, SmokeParams::from(&config))
    })
    .await;

    anyhow::ensure!(report.passed(), "smoke failed: {}", report.diagnostics);
    Ok(())
}
