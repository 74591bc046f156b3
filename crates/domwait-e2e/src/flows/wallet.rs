//! Wallet-extension popup confirmation.
//!
//! Deposits end in a transaction the wallet extension must sign. The wallet
//! opens its own browser window outside the page's DOM, so this flow works
//! at the window-handle level: poll for windows beyond the baseline count,
//! classify each by title/URL, press whichever confirm control that wallet
//! build renders in the first window that classifies as a wallet, switch
//! back. Non-wallet popups (promos, oauth windows) are skipped, never
//! clicked in.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use domwait::{Driver, Error, Locator, Result, Session};
use regex::Regex;

/// How the confirmation step ended. None of these abort the deposit flow by
/// themselves: a wallet with auto-confirm enabled legitimately produces
/// `NoPopup`, and the balance verification downstream is the real check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletOutcome {
    /// A wallet window appeared and a confirm control was clicked in it.
    Confirmed,
    /// No wallet-classified window appeared before the timeout. Windows
    /// that failed classification do not count.
    NoPopup,
    /// A wallet window appeared but none of the known confirm controls did.
    ControlsNotFound,
}

fn wallet_title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)metamask|rabby").expect("static pattern compiles"))
}

/// True when the window looks like a wallet extension popup.
fn is_wallet_window(title: &str, url: &str) -> bool {
    wallet_title_pattern().is_match(title) || url.starts_with("chrome-extension://")
}

fn confirm_candidates() -> Vec<Locator> {
    vec![
        Locator::text("Confirm"),
        Locator::text("Approve"),
        Locator::text("Sign"),
        Locator::text("Submit"),
        Locator::css("button[data-testid='page-container-footer-next']"),
    ]
}

/// Waits for a wallet popup past `baseline` open windows and confirms the
/// pending transaction in it.
///
/// `baseline` must be captured before the click that triggers the wallet:
/// popups can open faster than a post-click handle snapshot, and a late
/// snapshot would count the popup into the baseline and wait forever.
///
/// Every window beyond the baseline is visited and classified; confirm
/// clicks happen only in a window that classifies as a wallet, so a decoy
/// popup opening first (or instead) never receives them. Windows are
/// re-classified on every poll because an extension window can expose its
/// title and URL only after it finishes loading. Focus is returned to the
/// originating window on every path.
pub async fn confirm_in_popup<D: Driver>(
    session: &Session<D>,
    baseline: usize,
    popup_timeout: Duration,
    button_timeout: Duration,
) -> Result<WalletOutcome> {
    let main_window = session.current_window().await?;
    let start = Instant::now();

    loop {
        let handles = session.window_handles().await?;
        for handle in handles.iter().skip(baseline) {
            session.switch_to_window(handle).await?;
            // Best-effort reads; some wallet builds expose neither field.
            let title = session.title().await.unwrap_or_default();
            let url = session.current_url().await.unwrap_or_default();
            if !is_wallet_window(&title, &url) {
                tracing::debug!(%handle, %title, %url, "popup is not the wallet, skipping");
                continue;
            }
            tracing::info!(%handle, %title, %url, "entered wallet window");

            let outcome = match session
                .click_first_match(&confirm_candidates(), button_timeout)
                .await
            {
                Ok(()) => WalletOutcome::Confirmed,
                Err(Error::AllCandidatesFailed { .. }) => {
                    tracing::warn!(%title, "wallet window shows none of the known confirm controls");
                    WalletOutcome::ControlsNotFound
                }
                Err(err) => {
                    // Put focus back before surfacing the transport failure.
                    let _ = session.switch_to_window(&main_window).await;
                    return Err(err);
                }
            };

            // The popup usually closes itself after confirm; switching to
            // the main handle is valid either way.
            session.switch_to_window(&main_window).await?;
            return Ok(outcome);
        }

        if start.elapsed() >= popup_timeout {
            session.switch_to_window(&main_window).await?;
            tracing::info!("no wallet popup appeared; assuming auto-confirm or no tx needed");
            return Ok(WalletOutcome::NoPopup);
        }
        tokio::time::sleep(session.wait_spec().poll_interval).await;
    }
}
