use crate::page::PageOps;
use crate::selectors;
use scout_core::SearchOutcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Marker tokens that identify a sponsored/ad candidate. Compared against
/// lowercased class and data-attribute tokens of the link and its ancestors.
const SPONSORED_TOKENS: &[&str] = &[
    "ad",
    "ads",
    "advert",
    "advertisement",
    "sponsored",
    "sponsor",
    "promoted",
    "promo",
];

/// A result-link candidate as reported by the page, before exclusion rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub title: String,
    pub href: String,
    pub visible: bool,
    /// Lowercased class/data-attribute tokens from the link and its ancestors.
    #[serde(default)]
    pub markers: Vec<String>,
    /// Nearby label text such as "Sponsored", if the page carries one.
    #[serde(default)]
    pub badge: Option<String>,
}

fn is_sponsored(candidate: &RawCandidate) -> bool {
    if candidate
        .markers
        .iter()
        .any(|m| SPONSORED_TOKENS.contains(&m.as_str()))
    {
        return true;
    }
    match &candidate.badge {
        Some(badge) => {
            let badge = badge.trim().to_lowercase();
            badge == "ad" || badge == "ads" || badge.starts_with("sponsored")
        }
        None => false,
    }
}

fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    base.join(href).ok().map(|url| url.to_string())
}

/// Pick the first visible organic candidate with a non-empty title and a
/// resolvable URL. Sponsored exclusion runs before acceptance: a sponsored
/// block is never returned, even when it comes first.
pub fn choose_organic(candidates: &[RawCandidate], base: &Url) -> Option<(String, String)> {
    candidates
        .iter()
        .filter(|c| c.visible && !is_sponsored(c))
        .find_map(|c| {
            let title = c.title.trim();
            if title.is_empty() {
                return None;
            }
            let url = resolve_href(&c.href, base)?;
            Some((title.to_string(), url))
        })
}

/// Extracts the first organic result from a rendered results page.
pub struct ResultExtractor {
    base: Url,
    timeout: Duration,
}

impl ResultExtractor {
    pub fn new(base: Url, timeout: Duration) -> Self {
        Self { base, timeout }
    }

    /// Try the prioritized result selectors until one yields an organic
    /// candidate; `Failure("no_results")` when every strategy comes up empty
    /// within the bounded timeout.
    pub async fn extract<P: PageOps + ?Sized>(&self, page: &P) -> SearchOutcome {
        self.extract_prioritized(page, selectors::RESULT_LINKS).await
    }

    /// Same, but try a caller-supplied selector ahead of the standard list.
    /// Used by `extract_result` plan steps that carry their own selector.
    pub async fn extract_with<P: PageOps + ?Sized>(
        &self,
        page: &P,
        selector: &str,
    ) -> SearchOutcome {
        if let Some(found) = self.try_selector(page, selector).await {
            return found;
        }
        self.extract_prioritized(page, selectors::RESULT_LINKS).await
    }

    async fn extract_prioritized<P: PageOps + ?Sized>(
        &self,
        page: &P,
        candidates: &[&str],
    ) -> SearchOutcome {
        for selector in candidates {
            if let Some(found) = self.try_selector(page, selector).await {
                return found;
            }
        }
        SearchOutcome::failure("no_results")
    }

    async fn try_selector<P: PageOps + ?Sized>(
        &self,
        page: &P,
        selector: &str,
    ) -> Option<SearchOutcome> {
        if page.wait_for_selector(selector, self.timeout).await.is_err() {
            tracing::debug!(selector, "no match for result selector");
            return None;
        }
        match page.collect_result_candidates(selector).await {
            Ok(candidates) => choose_organic(&candidates, &self.base)
                .map(|(title, url)| SearchOutcome::success(title, url)),
            Err(err) => {
                tracing::debug!(selector, %err, "candidate collection failed");
                None
            }
        }
    }
}
