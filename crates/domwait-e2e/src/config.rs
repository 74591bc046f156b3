// Runtime configuration for the scenario harness
//
// Every knob is an environment variable first (the suite historically ran
// from a .env file) with a CLI flag alongside. Values arriving through the
// environment are untrusted strings: names are trimmed and selector strings
// have wrapping quotes stripped before they reach the engine.

use clap::{Parser, ValueEnum};
use domwait::strip_wrapping_quotes;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioKind {
    /// Full deposit flow with wallet confirmation and value verification.
    Deposit,
    /// Page-load smoke check: navigate, wait, assert on the title.
    Smoke,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "domwait-e2e",
    version,
    about = "Browser-driven end-to-end scenarios for the deposit flow"
)]
pub struct Config {
    /// Scenarios to run, in order.
    #[arg(
        long,
        env = "SCENARIOS",
        value_enum,
        value_delimiter = ',',
        default_value = "deposit"
    )]
    pub scenarios: Vec<ScenarioKind>,

    /// WebDriver endpoint (chromedriver or a Selenium hub).
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    /// Application under test.
    #[arg(long, env = "APP_URL", default_value = "https://3.finance")]
    pub app_url: String,

    /// View to select on the landing page ('Community' or 'Protocol').
    #[arg(long = "view", env = "VIEWS", default_value = "Community")]
    pub view_name: String,

    /// Space/module to open inside the view ('Grove', 'The Guild', ...).
    #[arg(long = "module", env = "SPACES", default_value = "Grove")]
    pub module_name: String,

    /// Instrument whose panel receives the deposit.
    #[arg(long = "instrument", env = "CDP_NAME", default_value = "sdCRV")]
    pub instrument_name: String,

    /// Amount to deposit, in instrument units.
    #[arg(long, env = "DEPOSIT_AMOUNT", default_value_t = 10_000.0)]
    pub deposit_amount: f64,

    /// Optional raw CSS selector for the displayed amount; wrapping quotes
    /// are stripped. Without it the flow scans the instrument's container.
    #[arg(long, env = "SDCRV_AMOUNT_SELECTOR")]
    pub amount_selector: Option<String>,

    /// Accepted slippage between expected and observed delta, in percent
    /// of the deposit amount (floored at one unit).
    #[arg(long, env = "SLIPPAGE_TOLERANCE_PCT", default_value_t = 2.0)]
    pub tolerance_pct: f64,

    /// Chrome binary path, when not on the driver's default.
    #[arg(long, env = "CHROME_BIN")]
    pub chrome_binary: Option<String>,

    /// Chrome user-data directory carrying the wallet extension profile.
    #[arg(long, env = "CHROME_USER_DATA")]
    pub user_data_dir: Option<String>,

    /// Profile directory name inside the user-data directory.
    #[arg(long, env = "CHROME_PROFILE")]
    pub profile_dir: Option<String>,

    /// Run the browser headless. Wallet extensions generally need a headed
    /// browser, so this is off by default.
    #[arg(long, env = "HEADLESS", default_value_t = false)]
    pub headless: bool,

    /// Per-step wait budget, in seconds.
    #[arg(long, env = "STEP_TIMEOUT_SECS", default_value_t = 10)]
    pub step_timeout_secs: u64,

    /// DOM polling interval, in milliseconds.
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 200)]
    pub poll_interval_ms: u64,

    /// Grace period for the indexer to reflect the deposit before the
    /// first re-read, in milliseconds.
    #[arg(long, env = "INDEXER_DELAY_MS", default_value_t = 5_000)]
    pub indexer_delay_ms: u64,

    /// Smoke scenario URL.
    #[arg(long, env = "SMOKE_URL", default_value = "https://example.com")]
    pub smoke_url: String,

    /// Fragment the smoke scenario expects in the page title.
    #[arg(long, env = "SMOKE_TITLE", default_value = "Example")]
    pub smoke_title: String,
}

impl Config {
    pub fn view_name(&self) -> &str {
        self.view_name.trim()
    }

    pub fn module_name(&self) -> &str {
        self.module_name.trim()
    }

    pub fn instrument_name(&self) -> &str {
        self.instrument_name.trim()
    }

    /// The amount selector with one layer of wrapping quotes removed, or
    /// `None` when unset/blank.
    pub fn sanitized_selector(&self) -> Option<String> {
        self.amount_selector
            .as_deref()
            .map(str::trim)
            .map(strip_wrapping_quotes)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn indexer_delay(&self) -> Duration {
        Duration::from_millis(self.indexer_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("domwait-e2e").chain(args.iter().copied()))
            .expect("args should parse")
    }

    #[test]
    fn defaults_mirror_the_historical_env_surface() {
        let config = parse(&[]);
        assert_eq!(config.view_name(), "Community");
        assert_eq!(config.module_name(), "Grove");
        assert_eq!(config.instrument_name(), "sdCRV");
        assert_eq!(config.deposit_amount, 10_000.0);
        assert_eq!(config.scenarios, vec![ScenarioKind::Deposit]);
    }

    #[test]
    fn names_are_trimmed() {
        let config = parse(&["--view", "  Protocol ", "--module", " The Guild "]);
        assert_eq!(config.view_name(), "Protocol");
        assert_eq!(config.module_name(), "The Guild");
    }

    #[test]
    fn selector_is_quote_stripped_and_blank_collapses_to_none() {
        let config = parse(&["--amount-selector", "\"div.amount\""]);
        assert_eq!(config.sanitized_selector().as_deref(), Some("div.amount"));

        let config = parse(&["--amount-selector", "  "]);
        assert_eq!(config.sanitized_selector(), None);
    }

    #[test]
    fn scenario_list_parses_comma_separated() {
        let config = parse(&["--scenarios", "deposit,smoke"]);
        assert_eq!(
            config.scenarios,
            vec![ScenarioKind::Deposit, ScenarioKind::Smoke]
        );
    }
}
