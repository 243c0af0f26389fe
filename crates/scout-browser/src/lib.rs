mod error;
mod executor;
mod extract;
mod flow;
mod page;
mod selectors;
mod session;

pub use error::{Error, Result};
pub use executor::execute_plan;
pub use extract::{RawCandidate, ResultExtractor, choose_organic};
pub use flow::run_search_flow;
pub use page::PageOps;
pub use selectors::{
    CONSENT_BUTTONS, DIRECT_SEARCH_PARAMS, RESULT_LINKS, SEARCH_INPUTS, SEARCH_OPEN_BUTTONS,
};
pub use session::BrowserSession;
