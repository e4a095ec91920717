use thiserror::Error;

/// Failure of a single provider lookup. These are scoped to one record and
/// never abort a run.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no results for {0:?}")]
    NoResults(String),
    #[error("provider returned {status}: {message}")]
    Service { status: String, message: String },
    #[error("provider responded with HTTP {0}")]
    Http(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(#[from] std::io::Error),
}

impl From<ureq::Error> for LookupError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, _) => Self::Http(code),
            // the transport's own Display carries the request URL, key included
            ureq::Error::Transport(t) => {
                let detail = t
                    .message()
                    .map(str::to_string)
                    .or_else(|| std::error::Error::source(&t).map(|x| x.to_string()));
                Self::Transport(match detail {
                    Some(detail) => format!("{}: {detail}", t.kind()),
                    None => t.kind().to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key: pass --api-key or set API_KEY (a .env file is read too)")]
    MissingApiKey,
    #[error("threshold must be a finite, non-negative number of metres, got {0}")]
    InvalidThreshold(f64),
    #[error("timeout must be at least one second")]
    InvalidTimeout,
    #[error("input is missing column {0:?}")]
    MissingColumn(String),
}
