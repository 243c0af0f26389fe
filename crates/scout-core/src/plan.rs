use serde::{Deserialize, Serialize};

/// Where a plan came from. A plan with `Ai` origin must be non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOrigin {
    Ai,
    None,
}

/// A single browser action inside a plan.
///
/// The set of actions is closed: anything else fails deserialization, so an
/// unknown step kind never reaches the validator or the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Navigate {
        url: String,
    },
    Click {
        selector: String,
    },
    Fill {
        selector: String,
        value: String,
    },
    PressEnter,
    WaitForSelector {
        selector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    ExtractResult {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
    },
}

impl Step {
    /// Action name as it appears on the wire, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Navigate { .. } => "navigate",
            Step::Click { .. } => "click",
            Step::Fill { .. } => "fill",
            Step::PressEnter => "press_enter",
            Step::WaitForSelector { .. } => "wait_for_selector",
            Step::ExtractResult { .. } => "extract_result",
        }
    }
}

/// An ordered sequence of steps supplied by an external planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
    pub source: PlanOrigin,
}

impl Plan {
    /// Wrap planner-produced steps.
    pub fn from_ai(steps: Vec<Step>) -> Self {
        Self {
            steps,
            source: PlanOrigin::Ai,
        }
    }

    /// The "no plan provided" placeholder.
    pub fn none() -> Self {
        Self {
            steps: Vec::new(),
            source: PlanOrigin::None,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
