use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no API key configured for the planner")]
    MissingApiKey,

    #[error("planner request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("planner endpoint returned {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("planner reply was not usable: {0}")]
    BadResponse(String),

    #[error("planner returned no steps")]
    EmptyPlan,
}

pub type Result<T> = std::result::Result<T, Error>;
