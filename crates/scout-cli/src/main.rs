use anyhow::{Context, Result};
use clap::Parser;
use scout_agent::OpenAiPlanner;
use scout_cli::OutputFormat;
use scout_core::{PlannerConfig, RetryPolicy, RunConfig};
use std::process::ExitCode;
use std::time::Duration;
use url::Url;

#[derive(Parser)]
#[command(name = "scout")]
#[command(author, version)]
#[command(
    about = "Search a target site and report the first organic result",
    long_about = "Search a target site and report the first organic result.\n\n\
                  Scout drives a browser through a single search task. When a planner API key \
                  is configured it asks an LLM for a step plan first; any unusable plan falls \
                  back to the deterministic UI search, and failing that, a direct search URL."
)]
struct Cli {
    /// Homepage of the target site
    #[arg(long, env = "TARGET_URL", default_value = "https://lacity.gov/")]
    site: String,

    /// Search term
    #[arg(short, long, env = "SEARCH_QUERY", default_value = "311")]
    query: String,

    /// Natural-language goal handed to the planner
    #[arg(long, env = "GOAL")]
    goal: Option<String>,

    /// Run with a visible browser window
    #[arg(long, env = "HEADFUL")]
    headful: bool,

    /// Disable the AI planner even when an API key is present
    #[arg(long)]
    no_planner: bool,

    /// Planner model name
    #[arg(long, env = "MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_API_BASE", default_value = "https://api.openai.com/v1")]
    api_base: String,

    /// API key for the planner; unset means deterministic-only
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Navigation retry attempts per fallback tier
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// Backoff between retry attempts, in milliseconds
    #[arg(long, default_value_t = 800)]
    backoff_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let base_url = Url::parse(&cli.site)
        .with_context(|| format!("invalid target site URL: {}", cli.site))?;

    let mut cfg = RunConfig::new(base_url, cli.query);
    cfg.headful = cli.headful;
    cfg.retry = RetryPolicy::new(cli.max_attempts, Duration::from_millis(cli.backoff_ms));
    if let Some(goal) = cli.goal {
        cfg.goal = goal;
    }
    if !cli.no_planner {
        cfg.planner = cli.api_key.map(|api_key| PlannerConfig {
            api_key,
            api_base: cli.api_base,
            model: cli.model,
            timeout: Duration::from_secs(60),
        });
    }

    let planner = match &cfg.planner {
        Some(planner_cfg) => match OpenAiPlanner::new(planner_cfg.clone()) {
            Ok(planner) => Some(planner),
            Err(err) => {
                tracing::warn!(%err, "planner unavailable, running deterministic-only");
                None
            }
        },
        None => None,
    };

    let result = scout_cli::run(
        &cfg,
        planner
            .as_ref()
            .map(|p| p as &dyn scout_agent::PlanProvider),
    )
    .await;

    scout_cli::print_result(&result, cli.format);
    Ok(ExitCode::from(scout_cli::exit_code(&result)))
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("scout_cli=debug,scout_core=debug,scout_browser=debug,scout_agent=debug")
    } else {
        EnvFilter::new("scout_cli=info,scout_browser=info,scout_agent=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
