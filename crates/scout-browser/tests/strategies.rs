//! Strategy behavior tests over a scripted page: tier fallback order, mode
//! tracking, and plan-executor halting semantics.

use async_trait::async_trait;
use scout_browser::{Error, PageOps, RawCandidate, Result, execute_plan, run_search_flow};
use scout_core::{Mode, Plan, RetryPolicy, RunConfig, SearchOutcome, Step, validate};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Default)]
struct FakePage {
    navigate_all_ok: bool,
    reachable: HashSet<String>,
    present_selectors: HashSet<String>,
    candidates: HashMap<String, Vec<RawCandidate>>,
    calls: Mutex<Vec<String>>,
}

impl FakePage {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count_calls(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn with_selector(mut self, selector: &str) -> Self {
        self.present_selectors.insert(selector.to_string());
        self
    }

    fn with_candidates(mut self, selector: &str, candidates: Vec<RawCandidate>) -> Self {
        self.present_selectors.insert(selector.to_string());
        self.candidates.insert(selector.to_string(), candidates);
        self
    }
}

#[async_trait]
impl PageOps for FakePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.record(format!("navigate:{url}"));
        if self.navigate_all_ok || self.reachable.contains(url) {
            Ok(())
        } else {
            Err(Error::Navigation(format!("{url}: connection refused")))
        }
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> Result<()> {
        self.record(format!("wait:{selector}"));
        if self.present_selectors.contains(selector) {
            Ok(())
        } else {
            Err(Error::SelectorNotFound(selector.to_string()))
        }
    }

    async fn click(&self, selector: &str, _timeout: Duration) -> Result<()> {
        self.record(format!("click:{selector}"));
        if self.present_selectors.contains(selector) {
            Ok(())
        } else {
            Err(Error::SelectorNotFound(selector.to_string()))
        }
    }

    async fn fill(&self, selector: &str, value: &str, _timeout: Duration) -> Result<()> {
        self.record(format!("fill:{selector}={value}"));
        if self.present_selectors.contains(selector) {
            Ok(())
        } else {
            Err(Error::SelectorNotFound(selector.to_string()))
        }
    }

    async fn press_enter(&self) -> Result<()> {
        self.record("press_enter");
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok("https://lacity.gov/search?q=311".to_string())
    }

    async fn collect_result_candidates(&self, selector: &str) -> Result<Vec<RawCandidate>> {
        self.record(format!("collect:{selector}"));
        Ok(self.candidates.get(selector).cloned().unwrap_or_default())
    }

    async fn snapshot(&self) -> Result<serde_json::Value> {
        Ok(serde_json::json!({ "title": "fake page" }))
    }
}

fn config() -> RunConfig {
    let mut cfg = RunConfig::new(Url::parse("https://lacity.gov/").unwrap(), "311");
    cfg.element_timeout = Duration::from_millis(10);
    cfg
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO)
}

fn result_link(title: &str, href: &str) -> RawCandidate {
    RawCandidate {
        title: title.to_string(),
        href: href.to_string(),
        visible: true,
        markers: vec![],
        badge: None,
    }
}

#[tokio::test]
async fn test_ui_search_reports_ui_mode() {
    let page = FakePage {
        navigate_all_ok: true,
        ..Default::default()
    }
    .with_selector("input[type='search']")
    .with_candidates(
        "main article h3 a",
        vec![result_link("LA 311 Services", "/311-services")],
    );

    let (outcome, mode) = run_search_flow(&page, &config(), &fast_retry()).await;

    assert_eq!(mode, Mode::FallbackCoreUi);
    assert_eq!(
        outcome,
        SearchOutcome::success("LA 311 Services", "https://lacity.gov/311-services")
    );
    let calls = page.calls();
    assert!(calls.contains(&"fill:input[type='search']=311".to_string()));
    assert!(calls.contains(&"press_enter".to_string()));
    // The UI tier navigated once, to the homepage; never to /search.
    assert_eq!(page.count_calls("navigate:"), 1);
}

#[tokio::test]
async fn test_missing_search_input_falls_back_to_direct_mode() {
    let page = FakePage {
        navigate_all_ok: true,
        ..Default::default()
    }
    .with_candidates(
        "main article h3 a",
        vec![result_link("LA 311 Services", "/311-services")],
    );

    let (outcome, mode) = run_search_flow(&page, &config(), &fast_retry()).await;

    assert_eq!(mode, Mode::FallbackCoreDirect);
    assert!(outcome.is_success());
    assert_eq!(page.count_calls("navigate:https://lacity.gov/search?q=311"), 1);
    assert!(!page.calls().contains(&"press_enter".to_string()));
}

#[tokio::test]
async fn test_unreachable_site_exhausts_every_tier() {
    let page = FakePage::default();
    let retry = fast_retry();

    let (outcome, mode) = run_search_flow(&page, &config(), &retry).await;

    assert_eq!(outcome, SearchOutcome::failure("search_unreachable"));
    assert_eq!(mode, Mode::FallbackCoreDirect);
    // Homepage retried 3 times, then each of q/query/search retried 3 times.
    assert_eq!(page.count_calls("navigate:"), 12);
    assert_eq!(page.count_calls("navigate:https://lacity.gov/search?query=311"), 3);
}

#[tokio::test]
async fn test_loaded_page_without_results_reports_no_results() {
    let page = FakePage {
        navigate_all_ok: true,
        ..Default::default()
    }
    .with_selector("input[type='search']");

    let (outcome, mode) = run_search_flow(&page, &config(), &fast_retry()).await;

    assert_eq!(outcome, SearchOutcome::failure("no_results"));
    assert_eq!(mode, Mode::FallbackCoreUi);
}

#[tokio::test]
async fn test_consent_banner_is_dismissed_when_present() {
    let page = FakePage {
        navigate_all_ok: true,
        ..Default::default()
    }
    .with_selector("#onetrust-accept-btn-handler")
    .with_selector("input[type='search']")
    .with_candidates("main article h3 a", vec![result_link("311", "/311")]);

    let (_, mode) = run_search_flow(&page, &config(), &fast_retry()).await;

    assert_eq!(mode, Mode::FallbackCoreUi);
    assert!(
        page.calls()
            .contains(&"click:#onetrust-accept-btn-handler".to_string())
    );
}

fn scenario_plan() -> Plan {
    Plan::from_ai(vec![
        Step::Navigate {
            url: "https://lacity.gov/".to_string(),
        },
        Step::Fill {
            selector: "input[type='search']".to_string(),
            value: "311".to_string(),
        },
        Step::ExtractResult { selector: None },
    ])
}

#[tokio::test]
async fn test_executor_runs_validated_plan_to_completion() {
    let cfg = config();
    let plan = validate(scenario_plan(), &cfg.base_url).expect("plan should validate");
    let page = FakePage {
        navigate_all_ok: true,
        ..Default::default()
    }
    .with_selector("input[type='search']")
    .with_candidates("main article h3 a", vec![result_link("311", "/311")]);

    let outcome = execute_plan(&plan, &page, &cfg).await;

    assert_eq!(outcome, SearchOutcome::success("311", "https://lacity.gov/311"));
    let calls = page.calls();
    let navigate_at = calls.iter().position(|c| c.starts_with("navigate:")).unwrap();
    let fill_at = calls.iter().position(|c| c.starts_with("fill:")).unwrap();
    let collect_at = calls.iter().position(|c| c.starts_with("collect:")).unwrap();
    assert!(navigate_at < fill_at && fill_at < collect_at);
}

#[tokio::test]
async fn test_executor_halts_at_first_exhausted_step() {
    let cfg = config();
    let plan = Plan::from_ai(vec![
        Step::Navigate {
            url: "https://lacity.gov/".to_string(),
        },
        Step::Click {
            selector: "#does-not-exist".to_string(),
        },
        Step::ExtractResult { selector: None },
    ]);
    let plan = validate(plan, &cfg.base_url).expect("plan should validate");
    let page = FakePage {
        navigate_all_ok: true,
        ..Default::default()
    };

    let outcome = execute_plan(&plan, &page, &cfg).await;

    assert_eq!(outcome, SearchOutcome::failure("plan_step_failed:1"));
    // One retry for the failing step, then a hard halt: the terminal
    // extract_result step never runs.
    assert_eq!(page.count_calls("click:#does-not-exist"), 2);
    assert_eq!(page.count_calls("collect:"), 0);
}

#[tokio::test]
async fn test_executor_prefers_step_supplied_extract_selector() {
    let cfg = config();
    let plan = Plan::from_ai(vec![
        Step::Navigate {
            url: "https://lacity.gov/search?q=311".to_string(),
        },
        Step::ExtractResult {
            selector: Some(".custom-results a".to_string()),
        },
    ]);
    let plan = validate(plan, &cfg.base_url).expect("plan should validate");
    let page = FakePage {
        navigate_all_ok: true,
        ..Default::default()
    }
    .with_candidates(
        ".custom-results a",
        vec![result_link("MyLA311", "https://myla311.lacity.org/")],
    );

    let outcome = execute_plan(&plan, &page, &cfg).await;

    assert_eq!(
        outcome,
        SearchOutcome::success("MyLA311", "https://myla311.lacity.org/")
    );
}
