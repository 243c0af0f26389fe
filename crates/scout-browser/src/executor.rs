use crate::extract::ResultExtractor;
use crate::page::PageOps;
use scout_core::{Plan, RetryPolicy, RunConfig, SearchOutcome, Step};
use std::time::Duration;

/// Execute an already-validated plan strictly in order.
///
/// Each step gets the bounded plan-step retry budget; the first step that
/// exhausts it halts execution immediately with
/// `Failure("plan_step_failed:<index>")`. No internal fallback: escalating to
/// the deterministic strategy is the orchestrator's job.
pub async fn execute_plan<P: PageOps + ?Sized>(
    plan: &Plan,
    page: &P,
    cfg: &RunConfig,
) -> SearchOutcome {
    let retry = RetryPolicy::plan_step();

    for (index, step) in plan.steps.iter().enumerate() {
        let mut last_err = None;
        let mut done = None;
        for attempt in 1..=retry.max_attempts {
            match run_step(step, page, cfg).await {
                Ok(outcome) => {
                    done = Some(outcome);
                    break;
                }
                Err(err) => {
                    tracing::warn!(index, kind = step.kind(), attempt, %err, "plan step failed");
                    last_err = Some(err);
                    if attempt < retry.max_attempts {
                        tokio::time::sleep(retry.backoff).await;
                    }
                }
            }
        }
        match done {
            // The terminal extract_result step yields the plan's outcome.
            Some(Some(outcome)) => return outcome,
            Some(None) => continue,
            None => {
                tracing::warn!(index, kind = step.kind(), ?last_err, "halting plan execution");
                return SearchOutcome::failure(format!("plan_step_failed:{index}"));
            }
        }
    }

    // Unreachable for validated plans, which always end in extract_result.
    SearchOutcome::failure("plan_incomplete")
}

async fn run_step<P: PageOps + ?Sized>(
    step: &Step,
    page: &P,
    cfg: &RunConfig,
) -> crate::Result<Option<SearchOutcome>> {
    match step {
        Step::Navigate { url } => {
            page.navigate(url).await?;
            Ok(None)
        }
        Step::Click { selector } => {
            page.click(selector, cfg.element_timeout).await?;
            Ok(None)
        }
        Step::Fill { selector, value } => {
            page.fill(selector, value, cfg.element_timeout).await?;
            Ok(None)
        }
        Step::PressEnter => {
            page.press_enter().await?;
            Ok(None)
        }
        Step::WaitForSelector {
            selector,
            timeout_ms,
        } => {
            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(cfg.element_timeout);
            page.wait_for_selector(selector, timeout).await?;
            Ok(None)
        }
        Step::ExtractResult { selector } => {
            let extractor = ResultExtractor::new(cfg.base_url.clone(), cfg.element_timeout);
            let outcome = match selector {
                Some(selector) => extractor.extract_with(page, selector).await,
                None => extractor.extract(page).await,
            };
            Ok(Some(outcome))
        }
    }
}
