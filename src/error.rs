use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search API returned HTTP {status}: {body}")]
    BadResponse { status: u16, body: String },

    #[error("profile API login failed: {reason}")]
    Login { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report error: {0}")]
    Report(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
