use clap::ValueEnum;
use console::style;
use scout_agent::PlanProvider;
use scout_browser::{BrowserSession, PageOps, execute_plan, run_search_flow};
use scout_core::{Mode, RunConfig, SearchOutcome, TaggedResult, tag, validate};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// One full run: launch the browser, resolve an outcome through the strategy
/// ladder, close the browser, tag the result. Always returns a TaggedResult;
/// the session is closed on every path before this returns.
pub async fn run(cfg: &RunConfig, planner: Option<&dyn PlanProvider>) -> TaggedResult {
    let session = match BrowserSession::open(cfg.headful, cfg.nav_timeout).await {
        Ok(session) => session,
        Err(err) => {
            tracing::error!(%err, "browser launch failed");
            return tag(
                SearchOutcome::failure(format!("browser_launch_failed: {err}")),
                Mode::FallbackCoreDirect,
                &cfg.query,
            );
        }
    };

    let (outcome, mode) = resolve_outcome(&session, cfg, planner).await;
    session.close().await;
    tag(outcome, mode, &cfg.query)
}

/// The decision engine: try the AI plan when a planner is available, fall
/// back to the deterministic search flow on any rejection or failure. The
/// returned mode is declared by the branch that produced the outcome, never
/// inferred afterwards.
pub async fn resolve_outcome<P: PageOps + ?Sized>(
    page: &P,
    cfg: &RunConfig,
    planner: Option<&dyn PlanProvider>,
) -> (SearchOutcome, Mode) {
    if let Some(planner) = planner {
        match ai_attempt(page, cfg, planner).await {
            Ok(outcome @ SearchOutcome::Success { .. }) => return (outcome, Mode::AiPlan),
            Ok(SearchOutcome::Failure { reason }) => {
                tracing::warn!(reason, "AI plan produced no result, falling back");
            }
            Err(reason) => {
                tracing::warn!(reason, "no usable AI plan, falling back");
            }
        }
    }
    run_search_flow(page, cfg, &cfg.retry).await
}

async fn ai_attempt<P: PageOps + ?Sized>(
    page: &P,
    cfg: &RunConfig,
    planner: &dyn PlanProvider,
) -> Result<SearchOutcome, String> {
    // Best-effort page context so the planner proposes selectors that exist.
    if let Err(err) = page.navigate(cfg.base_url.as_str()).await {
        tracing::debug!(%err, "homepage preview for the planner failed");
    }
    let snapshot = page.snapshot().await.ok();

    let plan = planner
        .fetch_plan(&cfg.goal, &cfg.query, snapshot.as_ref())
        .await
        .map_err(|err| err.to_string())?;
    let plan = validate(plan, &cfg.base_url).map_err(|err| err.to_string())?;

    tracing::info!(steps = plan.len(), "AI plan accepted, executing");
    Ok(execute_plan(&plan, page, cfg).await)
}

pub fn print_result(result: &TaggedResult, format: OutputFormat) {
    let json = serde_json::to_string(result).unwrap_or_else(|_| "{}".to_string());
    match format {
        OutputFormat::Json => println!("{json}"),
        OutputFormat::Pretty => match &result.error {
            None => println!(
                "{} Query='{}' | First result: {} | URL: {} | mode={}",
                style("Success!").green().bold(),
                result.query,
                result.title,
                result.url,
                result.mode.as_str(),
            ),
            Some(error) => println!(
                "{} {} (mode={})",
                style("Failure:").red().bold(),
                error,
                result.mode.as_str(),
            ),
        },
    }
}

/// 0 on success, 2 when the browser never launched, 1 for any other failure.
pub fn exit_code(result: &TaggedResult) -> u8 {
    match &result.error {
        None => 0,
        Some(error) if error.starts_with("browser_launch_failed") => 2,
        Some(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_outcome() {
        let ok = tag(SearchOutcome::success("t", "u"), Mode::AiPlan, "311");
        assert_eq!(exit_code(&ok), 0);

        let failed = tag(
            SearchOutcome::failure("search_unreachable"),
            Mode::FallbackCoreDirect,
            "311",
        );
        assert_eq!(exit_code(&failed), 1);

        let no_browser = tag(
            SearchOutcome::failure("browser_launch_failed: no chrome"),
            Mode::FallbackCoreDirect,
            "311",
        );
        assert_eq!(exit_code(&no_browser), 2);
    }
}
