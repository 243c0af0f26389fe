use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Selector not found: {0}")]
    SelectorNotFound(String),

    #[error("Script evaluation failed: {0}")]
    Evaluate(String),

    #[error("CDP error: {0}")]
    Cdp(String),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
