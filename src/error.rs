use thiserror::Error;

/// Errors raised while configuring, driving or exporting a scrape
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Reading or writing a local file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config parsing or JSON rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV rendering failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Could not open a WebDriver session
    #[error("failed to start browser session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    /// A WebDriver command failed (navigation, source, script, cookie)
    #[error("browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    /// An element the page is expected to contain was not there
    #[error("no element matching `{selector}` on {url}")]
    MissingElement { selector: String, url: String },

    /// A configured CSS selector does not parse
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),

    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The page kept loading resources past the configured limit
    #[error("timed out after {0:?} waiting for network idle")]
    Timeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
