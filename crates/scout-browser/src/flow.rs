use crate::extract::ResultExtractor;
use crate::page::PageOps;
use crate::selectors;
use scout_core::{Mode, RetryPolicy, RunConfig, SearchOutcome};
use std::time::Duration;

/// Consent banners either dismiss quickly or are not there at all.
const CONSENT_TIMEOUT: Duration = Duration::from_millis(1500);

/// The deterministic strategy: homepage, banner dismissal, UI search, and a
/// direct URL-encoded search as the fallback of last resort.
///
/// Always terminates with exactly one outcome, tagged with the tier that
/// produced the navigated results page: `FallbackCoreUi` when the UI search
/// submitted, `FallbackCoreDirect` when the direct URL did (or when even that
/// tier exhausted).
pub async fn run_search_flow<P: PageOps + ?Sized>(
    page: &P,
    cfg: &RunConfig,
    retry: &RetryPolicy,
) -> (SearchOutcome, Mode) {
    let extractor = ResultExtractor::new(cfg.base_url.clone(), cfg.element_timeout);

    match ui_tier(page, cfg, retry).await {
        Ok(()) => {
            tracing::info!("UI search submitted, extracting first result");
            return (extractor.extract(page).await, Mode::FallbackCoreUi);
        }
        Err(reason) => {
            tracing::warn!(reason, "UI search tier failed, escalating to direct search");
        }
    }

    if direct_tier(page, cfg, retry).await {
        tracing::info!("direct search page loaded, extracting first result");
        (extractor.extract(page).await, Mode::FallbackCoreDirect)
    } else {
        (
            SearchOutcome::failure("search_unreachable"),
            Mode::FallbackCoreDirect,
        )
    }
}

/// Navigate with bounded retries. True once a navigation succeeds.
async fn navigate_retrying<P: PageOps + ?Sized>(
    page: &P,
    url: &str,
    retry: &RetryPolicy,
) -> bool {
    for attempt in 1..=retry.max_attempts {
        match page.navigate(url).await {
            Ok(()) => return true,
            Err(err) => {
                tracing::warn!(url, attempt, %err, "navigation failed");
            }
        }
        if attempt < retry.max_attempts {
            tokio::time::sleep(retry.backoff).await;
        }
    }
    false
}

async fn ui_tier<P: PageOps + ?Sized>(
    page: &P,
    cfg: &RunConfig,
    retry: &RetryPolicy,
) -> Result<(), &'static str> {
    if !navigate_retrying(page, cfg.base_url.as_str(), retry).await {
        return Err("homepage_unreachable");
    }

    dismiss_consent_banner(page).await;
    open_search_ui(page).await;

    let mut filled = false;
    for attempt in 1..=retry.max_attempts {
        if fill_search_input(page, cfg).await {
            filled = true;
            break;
        }
        tracing::debug!(attempt, "no search input candidate matched");
        if attempt < retry.max_attempts {
            tokio::time::sleep(retry.backoff).await;
        }
    }
    if !filled {
        return Err("search_input_unavailable");
    }

    if page.press_enter().await.is_err() {
        return Err("search_submit_failed");
    }
    if let Ok(url) = page.current_url().await {
        tracing::debug!(url, "search submitted");
    }
    Ok(())
}

/// Best-effort: absence of a banner is not an error.
async fn dismiss_consent_banner<P: PageOps + ?Sized>(page: &P) {
    for selector in selectors::CONSENT_BUTTONS {
        if page.click(selector, CONSENT_TIMEOUT).await.is_ok() {
            tracing::debug!(selector, "dismissed consent banner");
            return;
        }
    }
}

/// Some sites hide the search input behind a toggle. Also best-effort.
async fn open_search_ui<P: PageOps + ?Sized>(page: &P) {
    for selector in selectors::SEARCH_OPEN_BUTTONS {
        if page.click(selector, CONSENT_TIMEOUT).await.is_ok() {
            tracing::debug!(selector, "opened search UI");
            return;
        }
    }
}

/// Try each input candidate in priority order; true once one took the query.
async fn fill_search_input<P: PageOps + ?Sized>(page: &P, cfg: &RunConfig) -> bool {
    for selector in selectors::SEARCH_INPUTS {
        match page.fill(selector, &cfg.query, cfg.element_timeout).await {
            Ok(()) => {
                tracing::debug!(selector, "filled search input");
                return true;
            }
            Err(err) => {
                tracing::debug!(selector, %err, "search input candidate failed");
            }
        }
    }
    false
}

/// Navigate straight to the URL-encoded results page, trying the known query
/// parameter names in order. True once any of them loads.
async fn direct_tier<P: PageOps + ?Sized>(page: &P, cfg: &RunConfig, retry: &RetryPolicy) -> bool {
    for param in selectors::DIRECT_SEARCH_PARAMS {
        let url = cfg.direct_search_url(param);
        if navigate_retrying(page, url.as_str(), retry).await {
            return true;
        }
    }
    false
}
