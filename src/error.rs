//! Error type shared by every stage of a search run.
//!
//! Input validation, the empty-results case and date parsing each get their
//! own variant because `main` treats them differently: invalid input aborts
//! before a browser is opened, an empty search ends the run quietly, and
//! everything else aborts with whatever has been written so far.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A search parameter was missing or had the wrong shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The site reported no matches for the phrase.
    #[error("No news found for the searched phrase: {phrase}")]
    NoResultsFound { phrase: String },

    /// A published-date string matched none of the known formats.
    #[error("could not parse date {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("no element matches {0}")]
    ElementNotFound(String),

    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    #[error("could not start browser session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("spreadsheet export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("workbook export failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub fn parse(input: &str, reason: impl Into<String>) -> Self {
        ScrapeError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ScrapeError::InvalidInput(msg.into())
    }
}
