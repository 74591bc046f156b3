use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use domwait_e2e::flows::{deposit, smoke};
use domwait_e2e::{bootstrap, run_scenario, Config, ScenarioKind, ScenarioReport};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let mut reports: Vec<ScenarioReport> = Vec::new();

    for kind in &config.scenarios {
        // Each scenario gets a fresh browser; a failed bootstrap is fatal
        // because every remaining scenario would fail the same way.
        let session = match bootstrap::chrome_session(&config).await {
            Ok(session) => session,
            Err(err) => {
                tracing::error!(error = %err, "could not start a browser session, aborting run");
                return ExitCode::FAILURE;
            }
        };

        let report = match kind {
            ScenarioKind::Deposit => {
                let params = deposit::DepositParams::from(&config);
                run_scenario("deposit", session, move |s| deposit::run(s, params)).await
            }
            ScenarioKind::Smoke => {
                let params = smoke::SmokeParams::from(&config);
                run_scenario("smoke", session, move |s| smoke::run(s, params)).await
            }
        };
        reports.push(report);
    }

    let mut failed = false;
    for report in &reports {
        if report.passed() {
            println!("PASS {} ({} ms)", report.name, report.duration_ms);
        } else {
            failed = true;
            println!(
                "FAIL {} ({} ms): {}",
                report.name, report.duration_ms, report.diagnostics
            );
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
