//! Scenario lifecycle: run a flow body against a fresh session and make
//! sure the browser is released exactly once no matter how the body ends.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use domwait::{Driver, Session};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    Panicked,
}

/// Per-scenario verdict, serializable for machine consumption of run logs.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub outcome: Outcome,
    pub duration_ms: u64,
    /// Error or panic text; empty on success.
    pub diagnostics: String,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Runs one scenario body to completion and tears the session down.
///
/// The body executes on its own task so a panic inside it is caught by the
/// join handle instead of unwinding past the teardown. `Session::quit` is
/// idempotent, but this path is the one place that calls it for a scenario
/// session, so the browser always dies exactly once.
pub async fn run_scenario<D, F, Fut>(
    name: &str,
    session: Session<D>,
    body: F,
) -> ScenarioReport
where
    D: Driver,
    F: FnOnce(Arc<Session<D>>) -> Fut,
    Fut: Future<Output = domwait::Result<()>> + Send + 'static,
{
    let started = Instant::now();
    let session = Arc::new(session);
    tracing::info!(scenario = name, "scenario start");

    let task = tokio::spawn(body(Arc::clone(&session)));
    let (outcome, diagnostics) = match task.await {
        Ok(Ok(())) => (Outcome::Passed, String::new()),
        Ok(Err(err)) => (Outcome::Failed, err.to_string()),
        Err(join_err) if join_err.is_panic() => {
            let payload = join_err.into_panic();
            let text = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "opaque panic payload".to_string());
            (Outcome::Panicked, text)
        }
        Err(join_err) => (Outcome::Failed, join_err.to_string()),
    };

    if let Err(err) = session.quit().await {
        tracing::warn!(scenario = name, error = %err, "session teardown failed");
    }

    let report = ScenarioReport {
        name: name.to_string(),
        outcome,
        duration_ms: started.elapsed().as_millis() as u64,
        diagnostics,
    };
    match report.outcome {
        Outcome::Passed => tracing::info!(
            scenario = name,
            duration_ms = report.duration_ms,
            "scenario passed"
        ),
        _ => tracing::error!(
            scenario = name,
            duration_ms = report.duration_ms,
            diagnostics = %report.diagnostics,
            "scenario failed"
        ),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use domwait::mock::ScriptedDriver;
    use domwait::Error;

    #[tokio::test]
    async fn quits_once_on_success() {
        let driver = ScriptedDriver::new();
        let report = run_scenario("ok", Session::new(driver.clone()), |_s| async {
            Ok::<(), Error>(())
        })
        .await;
        assert!(report.passed());
        assert_eq!(driver.quit_count(), 1);
    }

    #[tokio::test]
    async fn quits_once_when_body_fails() {
        let driver = ScriptedDriver::new();
        let report = run_scenario("bad", Session::new(driver.clone()), |_s| async {
            Err(Error::Assertion("expected balance to move".into()))
        })
        .await;
        assert_eq!(report.outcome, Outcome::Failed);
        assert!(report.diagnostics.contains("balance"));
        assert_eq!(driver.quit_count(), 1);
    }

    #[tokio::test]
    async fn quits_once_when_body_panics() {
        let driver = ScriptedDriver::new();
        let report = run_scenario("boom", Session::new(driver.clone()), |_s| async {
            panic!("wallet popup vanished");
        })
        .await;
        assert_eq!(report.outcome, Outcome::Panicked);
        assert!(report.diagnostics.contains("wallet popup"));
        assert_eq!(driver.quit_count(), 1);
    }
}
