use crate::error::Result;
use crate::extract::RawCandidate;
use async_trait::async_trait;
use std::time::Duration;

/// Primitive browser commands issued over the automation protocol.
///
/// `BrowserSession` implements this against a live CDP page; the search flow
/// and the plan executor are written against the trait so they can be tested
/// with a scripted page.
#[async_trait]
pub trait PageOps: Send + Sync {
    /// Navigate the page. Fails with `Error::Navigation` on timeout/DNS/TLS
    /// failure. No retries at this layer; callers own retry policy.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Wait until a selector matches, bounded by `timeout`.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Wait for and click the first element matching `selector`.
    async fn click(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Wait for, focus, and type into the first element matching `selector`.
    async fn fill(&self, selector: &str, value: &str, timeout: Duration) -> Result<()>;

    /// Press Enter in the currently focused element.
    async fn press_enter(&self) -> Result<()>;

    /// URL the page is currently on.
    async fn current_url(&self) -> Result<String>;

    /// All links matching `selector`, with the context the organic-result
    /// chooser needs (visibility, ancestor markers, badge text).
    async fn collect_result_candidates(&self, selector: &str) -> Result<Vec<RawCandidate>>;

    /// Compact description of the current page (title, URL, interactive
    /// elements) handed to the planner so proposed selectors refer to
    /// elements that exist.
    async fn snapshot(&self) -> Result<serde_json::Value>;
}
