use crate::retry::RetryPolicy;
use std::time::Duration;
use url::Url;

/// Frozen per-run configuration. Built once at process start from flags and
/// environment, then passed explicitly into every component.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Homepage of the target site.
    pub base_url: Url,
    /// The effective search term.
    pub query: String,
    /// Natural-language goal handed to the planner.
    pub goal: String,
    /// Run with a visible browser window.
    pub headful: bool,
    /// Retry policy for the deterministic strategy.
    pub retry: RetryPolicy,
    /// Budget for a full page navigation.
    pub nav_timeout: Duration,
    /// Budget for locating a single element.
    pub element_timeout: Duration,
    /// Planner settings; `None` disables the AI strategy.
    pub planner: Option<PlannerConfig>,
}

/// Settings for the OpenAI-compatible planner endpoint.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

impl RunConfig {
    pub fn new(base_url: Url, query: impl Into<String>) -> Self {
        let query = query.into();
        let goal = format!(
            "Open {base_url}, search for {query}, and report the first result title and URL."
        );
        Self {
            base_url,
            query,
            goal,
            headful: false,
            retry: RetryPolicy::default(),
            nav_timeout: Duration::from_secs(20),
            element_timeout: Duration::from_secs(8),
            planner: None,
        }
    }

    /// Deterministic results URL for the direct-search fallback, with the
    /// query URL-encoded under the given parameter name.
    pub fn direct_search_url(&self, param: &str) -> Url {
        let mut url = match self.base_url.join("search") {
            Ok(url) => url,
            Err(_) => self.base_url.clone(),
        };
        url.query_pairs_mut().clear().append_pair(param, &self.query);
        url
    }
}
