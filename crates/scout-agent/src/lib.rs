mod client;
mod error;
mod parse;

pub use client::{OpenAiPlanner, PlanProvider};
pub use error::{Error, Result};
pub use parse::{normalize_steps, parse_json_reply, steps_from_reply};
