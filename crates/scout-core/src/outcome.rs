use serde::Serialize;

/// Result of a single strategy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Success { title: String, url: String },
    Failure { reason: String },
}

impl SearchOutcome {
    pub fn success(title: impl Into<String>, url: impl Into<String>) -> Self {
        SearchOutcome::Success {
            title: title.into(),
            url: url.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        SearchOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success { .. })
    }
}

/// Which strategy actually produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    AiPlan,
    FallbackCoreUi,
    FallbackCoreDirect,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::AiPlan => "ai_plan",
            Mode::FallbackCoreUi => "fallback_core_ui",
            Mode::FallbackCoreDirect => "fallback_core_direct",
        }
    }
}

/// The externally visible artifact of a run: the outcome plus the mode that
/// produced it and the query that was searched. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedResult {
    #[serde(rename = "_mode")]
    pub mode: Mode,
    pub query: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaggedResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Wrap an outcome with its mode tag. Every producing branch calls this
/// explicitly; the mode is never inferred after the fact.
pub fn tag(outcome: SearchOutcome, mode: Mode, query: &str) -> TaggedResult {
    match outcome {
        SearchOutcome::Success { title, url } => TaggedResult {
            mode,
            query: query.to_string(),
            title,
            url,
            error: None,
        },
        SearchOutcome::Failure { reason } => TaggedResult {
            mode,
            query: query.to_string(),
            title: String::new(),
            url: String::new(),
            error: Some(reason),
        },
    }
}
