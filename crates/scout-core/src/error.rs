use thiserror::Error;

/// Terminal classification of an unusable plan.
///
/// Never retried: the caller routes straight to the deterministic strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid plan: {reason}")]
pub struct InvalidPlan {
    pub reason: String,
}

impl InvalidPlan {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
