pub mod config;
pub mod error;
pub mod outcome;
pub mod plan;
pub mod retry;
pub mod validate;

pub use config::{PlannerConfig, RunConfig};
pub use error::InvalidPlan;
pub use outcome::{Mode, SearchOutcome, TaggedResult, tag};
pub use plan::{Plan, PlanOrigin, Step};
pub use retry::RetryPolicy;
pub use validate::validate;
