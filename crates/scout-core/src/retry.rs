use std::time::Duration;

/// Bounded retry with a fixed backoff between attempts.
///
/// Created fresh per run and passed explicitly; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Policy for individual plan steps. An AI-authored selector failing
    /// repeatedly signals the plan itself is wrong, not transient flakiness,
    /// so steps get a single retry.
    pub fn plan_step() -> Self {
        Self::new(2, Duration::from_millis(800))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(800))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_allows_three_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Duration::from_millis(800));
    }

    #[test]
    fn test_plan_step_policy_allows_one_retry() {
        assert_eq!(RetryPolicy::plan_step().max_attempts, 2);
    }

    #[test]
    fn test_zero_attempts_is_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
