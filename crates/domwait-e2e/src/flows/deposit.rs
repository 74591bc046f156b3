//! The deposit scenario: navigate, select view/module/instrument, capture
//! the displayed amount, submit a deposit, confirm it in the wallet popup,
//! and verify the displayed amount moved by the deposited quantity.
//!
//! Every transition is gated by a bounded wait. Mandatory steps abort the
//! scenario on budget exhaustion; optional steps (entry banner, per-build
//! confirm buttons, wallet popup) are absorbed through `click_if_present`
//! and `try_locate`.

use std::sync::Arc;
use std::time::Duration;

use domwait::{
    extract_numeric_value, xpath_literal, DomElement, Driver, Error, Locator, Result, Session,
};

use crate::config::Config;
use crate::flows::wallet::{self, WalletOutcome};

/// Everything the flow needs, decoupled from the CLI surface.
#[derive(Debug, Clone)]
pub struct DepositParams {
    pub app_url: String,
    pub view: String,
    pub module: String,
    pub instrument: String,
    pub amount: f64,
    /// Explicit selector for the displayed amount; `None` falls back to a
    /// container scan around the instrument.
    pub amount_selector: Option<String>,
    pub tolerance_pct: f64,
    pub step_timeout: Duration,
    pub indexer_delay: Duration,
}

impl From<&Config> for DepositParams {
    fn from(config: &Config) -> Self {
        Self {
            app_url: config.app_url.clone(),
            view: config.view_name().to_string(),
            module: config.module_name().to_string(),
            instrument: config.instrument_name().to_string(),
            amount: config.deposit_amount,
            amount_selector: config.sanitized_selector(),
            tolerance_pct: config.tolerance_pct,
            step_timeout: config.step_timeout(),
            indexer_delay: config.indexer_delay(),
        }
    }
}

impl DepositParams {
    /// Accepted deviation between the observed delta and the deposited
    /// amount. Percent of the amount, floored at one unit so tiny deposits
    /// do not round the tolerance down to nothing.
    pub fn tolerance(&self) -> f64 {
        (self.amount * self.tolerance_pct / 100.0).max(1.0)
    }
}

/// Captured values, reported by the runner for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct DepositOutcome {
    pub before: f64,
    pub after: f64,
}

impl DepositOutcome {
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }
}

const AFTER_CAPTURE_ATTEMPTS: usize = 3;

pub async fn run<D: Driver>(session: Arc<Session<D>>, params: DepositParams) -> Result<()> {
    let outcome = execute(&session, &params).await?;
    tracing::info!(
        before = outcome.before,
        after = outcome.after,
        delta = outcome.delta(),
        "deposit verified"
    );
    Ok(())
}

async fn execute<D: Driver>(
    session: &Session<D>,
    params: &DepositParams,
) -> Result<DepositOutcome> {
    let timeout = params.step_timeout;

    session.goto(&params.app_url).await?;

    // The landing page varies by build; any of these means it rendered.
    let landing = [
        Locator::text("Compose Assets"),
        Locator::text("Assets"),
        Locator::text("Views"),
        Locator::text("VIEWS"),
    ];
    session.locate_any(&landing, timeout).await.map_err(|err| {
        err.context(format!("landing page at {} never rendered", params.app_url))
    })?;

    // Entry banner only some builds show.
    session
        .click_if_present(&Locator::text("Compose Assets"), short_wait(timeout))
        .await?;

    select_view(session, &params.view, timeout).await?;

    session
        .click_first_match(&module_candidates(&params.module), timeout)
        .await
        .map_err(|err| err.context(format!("module {:?} not clickable", params.module)))?;

    session
        .click_first_match(&instrument_candidates(&params.instrument), timeout)
        .await
        .map_err(|err| err.context(format!("instrument {:?} not clickable", params.instrument)))?;

    let before = capture_amount(session, params).await?;
    tracing::info!(before, "captured pre-deposit amount");

    open_deposit_form(session, timeout).await?;

    session
        .type_into_first_match(&amount_input_candidates(), timeout, &format_amount(params.amount))
        .await
        .map_err(|err| err.context("amount input not found".to_string()))?;

    // Baseline before any submit click: the wallet popup can open faster
    // than a post-click handle snapshot.
    let baseline = session.window_handles().await?.len();

    for label in ["Approve", "Deposit", "Confirm"] {
        session
            .click_if_present(&Locator::text(label), short_wait(timeout))
            .await?;
    }

    match wallet::confirm_in_popup(session, baseline, timeout, timeout).await? {
        WalletOutcome::Confirmed => tracing::info!("transaction confirmed in wallet"),
        WalletOutcome::NoPopup => tracing::info!("no wallet popup; continuing"),
        WalletOutcome::ControlsNotFound => {
            tracing::warn!("wallet popup had no known confirm control; continuing unconfirmed")
        }
    }

    // Give the indexer a head start before the first re-read.
    tokio::time::sleep(params.indexer_delay).await;
    session.refresh().await?;

    let refreshed = [
        Locator::text(&params.instrument),
        Locator::text("Deposit"),
        Locator::text("Withdraw"),
        Locator::text("Balance"),
    ];
    session
        .locate_any(&refreshed, timeout)
        .await
        .map_err(|err| err.context("page did not re-render after refresh".to_string()))?;

    let after = capture_after(session, params, before).await?;
    tracing::info!(after, "captured post-deposit amount");

    let outcome = DepositOutcome { before, after };
    let tolerance = params.tolerance();
    if (outcome.delta() - params.amount).abs() > tolerance {
        return Err(Error::Assertion(format!(
            "expected displayed amount to rise by {} (±{:.2}), observed {} -> {} (delta {})",
            params.amount, tolerance, outcome.before, outcome.after, outcome.delta()
        )));
    }
    Ok(outcome)
}

/// Selects the named view. Attribute locators first, then a hover scan for
/// icon-only controls whose name is in a tooltip, then plain text.
async fn select_view<D: Driver>(session: &Session<D>, view: &str, timeout: Duration) -> Result<()> {
    for locator in [Locator::attr("aria-label", view), Locator::attr("title", view)] {
        if let Some(element) = session.try_locate(&locator, short_wait(timeout)).await? {
            session.scroll_into_view(&element).await?;
            element.click().await?;
            tracing::debug!(view, %locator, "view selected by attribute");
            return Ok(());
        }
    }

    if hover_scan_for_view(session, view).await? {
        return Ok(());
    }

    session
        .click_first_match(&[Locator::text(view)], timeout)
        .await
        .map_err(|err| err.context(format!("view {:?} not selectable", view)))
}

/// Hovers each plausible icon control and watches for a tooltip carrying the
/// view name. Icon-only navigation exposes its label no other way.
async fn hover_scan_for_view<D: Driver>(session: &Session<D>, view: &str) -> Result<bool> {
    let tooltip = Locator::xpath(format!(
        "//*[(@role='tooltip' or contains(@class,'tooltip') or contains(@class,'tippy-content')) \
         and contains(., {})]",
        xpath_literal(view)
    ));
    let icon_pool = Locator::css("button, [role=\"button\"], a, [data-testid], [class*=\"icon\"]");

    let candidates = session.driver().find_all(&icon_pool).await?;
    tracing::debug!(count = candidates.len(), view, "hover-scanning icon candidates");
    for candidate in candidates {
        if !candidate.is_displayed().await.unwrap_or(false) {
            continue;
        }
        if session.hover_element(&candidate).await.is_err() {
            // Detached between find and hover; the scan moves on.
            continue;
        }
        if session
            .try_locate(&tooltip, Duration::from_millis(250))
            .await?
            .is_some()
        {
            candidate.click().await?;
            tracing::debug!(view, "view selected via hover tooltip");
            return Ok(true);
        }
    }
    Ok(false)
}

async fn open_deposit_form<D: Driver>(session: &Session<D>, timeout: Duration) -> Result<()> {
    let action_menu = [
        Locator::text("Actions"),
        Locator::text("ACTIONS"),
        Locator::text("Manage"),
    ];
    session
        .click_first_match(&action_menu, timeout)
        .await
        .map_err(|err| err.context("action menu not found".to_string()))?;

    let deposit_entry = [
        Locator::text("Deposit"),
        Locator::text("DEPOSIT"),
        Locator::text("Supply"),
    ];
    session
        .click_first_match(&deposit_entry, timeout)
        .await
        .map_err(|err| err.context("deposit entry not found".to_string()))
}

/// Reads the displayed amount: the configured selector when present, else
/// the largest numeric cell near the instrument.
async fn capture_amount<D: Driver>(session: &Session<D>, params: &DepositParams) -> Result<f64> {
    if let Some(selector) = &params.amount_selector {
        let element = session
            .locate_visible(&Locator::css(selector.clone()), params.step_timeout)
            .await
            .map_err(|err| err.context(format!("amount selector {selector:?} did not match")))?;
        let text = element.text().await?;
        return Ok(extract_numeric_value(&text));
    }
    scan_container_for_amount(session, params).await
}

/// XPath for the cells scanned when no amount selector is configured: any
/// div/span/p/td under a container mentioning the instrument. The container
/// match is case-insensitive since UIs render instrument names in varying
/// case ("sdCRV", "SDCRV").
pub fn value_cells_xpath(instrument: &str) -> String {
    let lowered = xpath_literal(&instrument.to_lowercase());
    format!(
        "//*[contains(translate(., 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', \
         'abcdefghijklmnopqrstuvwxyz'), {lowered})]\
         //*[self::div or self::span or self::p or self::td]"
    )
}

/// Fallback capture: scan every text-bearing cell inside the instrument's
/// container and take the largest parseable number. The balance is the
/// dominant figure on the panel, so "largest" beats guessing a class name.
async fn scan_container_for_amount<D: Driver>(
    session: &Session<D>,
    params: &DepositParams,
) -> Result<f64> {
    let cells = Locator::xpath(value_cells_xpath(&params.instrument));
    session
        .locate(&cells, params.step_timeout)
        .await
        .map_err(|err| {
            err.context(format!(
                "no value cells found near instrument {:?}",
                params.instrument
            ))
        })?;

    let mut best = 0.0_f64;
    for cell in session.driver().find_all(&cells).await? {
        let text = cell.text().await.unwrap_or_default();
        let value = extract_numeric_value(&text);
        if value > best {
            best = value;
        }
    }
    Ok(best)
}

/// Re-reads the amount after the deposit, refreshing between attempts while
/// the value has not yet risen. Indexers lag the chain; the last read is
/// returned either way and the tolerance check decides.
async fn capture_after<D: Driver>(
    session: &Session<D>,
    params: &DepositParams,
    before: f64,
) -> Result<f64> {
    let mut after = capture_amount(session, params).await?;
    for attempt in 1..AFTER_CAPTURE_ATTEMPTS {
        if after > before {
            break;
        }
        tracing::info!(attempt, after, before, "value not yet risen, refreshing");
        tokio::time::sleep(params.indexer_delay).await;
        session.refresh().await?;
        session
            .locate_any(&[Locator::text(&params.instrument)], params.step_timeout)
            .await?;
        after = capture_amount(session, params).await?;
    }
    Ok(after)
}

fn module_candidates(module: &str) -> Vec<Locator> {
    vec![
        Locator::text(module),
        Locator::xpath(format!("//*[contains(., {})]", xpath_literal(module))),
    ]
}

fn instrument_candidates(instrument: &str) -> Vec<Locator> {
    vec![
        Locator::text(instrument),
        Locator::text(instrument.to_uppercase()),
        Locator::text(instrument.to_lowercase()),
    ]
}

fn amount_input_candidates() -> Vec<Locator> {
    vec![
        Locator::css("input[type=\"number\"]"),
        Locator::css("input[placeholder*=\"qty\" i]"),
        Locator::css("input[placeholder*=\"quantity\" i]"),
        Locator::css("input[placeholder*=\"amount\" i]"),
        Locator::css("input"),
    ]
}

/// Amounts render without separators; integral values drop the fraction so
/// "10000" is typed rather than "10000.0".
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}

/// One quarter of the step budget, for steps that are allowed to be absent.
fn short_wait(timeout: Duration) -> Duration {
    (timeout / 4).max(Duration::from_millis(200))
}
