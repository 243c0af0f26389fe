use crate::error::InvalidPlan;
use crate::plan::{Plan, Step};
use url::Url;

/// Classify an externally supplied plan before execution.
///
/// Pure function: no side effects, never panics, same verdict for the same
/// input. Checks, in order:
/// - the plan is non-empty;
/// - every step carries its required parameters (non-empty selectors, a
///   parseable URL for `navigate`);
/// - every `navigate` stays on the configured site's host (a syntactically
///   valid plan that wanders off-site is rejected rather than executed);
/// - exactly one `extract_result` step exists and it is the last step.
pub fn validate(plan: Plan, base: &Url) -> Result<Plan, InvalidPlan> {
    if plan.steps.is_empty() {
        return Err(InvalidPlan::new("plan is empty"));
    }

    let last = plan.steps.len() - 1;
    for (index, step) in plan.steps.iter().enumerate() {
        match step {
            Step::Navigate { url } => {
                let parsed = Url::parse(url).map_err(|_| {
                    InvalidPlan::new(format!("step {index}: navigate url '{url}' is not a URL"))
                })?;
                if parsed.host_str() != base.host_str() {
                    return Err(InvalidPlan::new(format!(
                        "step {index}: navigate leaves the target site ({url})"
                    )));
                }
            }
            Step::Click { selector } | Step::WaitForSelector { selector, .. } => {
                if selector.trim().is_empty() {
                    return Err(InvalidPlan::new(format!(
                        "step {index}: {} requires a selector",
                        step.kind()
                    )));
                }
            }
            Step::Fill { selector, .. } => {
                if selector.trim().is_empty() {
                    return Err(InvalidPlan::new(format!(
                        "step {index}: fill requires a selector"
                    )));
                }
            }
            Step::PressEnter => {}
            Step::ExtractResult { .. } => {
                if index != last {
                    return Err(InvalidPlan::new(format!(
                        "step {index}: extract_result must be the final step"
                    )));
                }
            }
        }
    }

    match plan.steps.last() {
        Some(Step::ExtractResult { .. }) => Ok(plan),
        _ => Err(InvalidPlan::new(
            "plan is missing a terminal extract_result step",
        )),
    }
}
