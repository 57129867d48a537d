use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error("unexpected page structure at {url}: {context} not found")]
    Parse { url: String, context: &'static str },
    #[error("invalid selector {0:?}")]
    Selector(&'static str),
    #[error("cannot parse {what} from {value:?}")]
    Format { what: &'static str, value: String },
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub fn parse(url: &str, context: &'static str) -> Self {
        ScrapeError::Parse { url: url.to_string(), context }
    }
}
