use thiserror::Error;

/// A search or extract call failed.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Missing search API key. Set PARALLEL_API_KEY or search.api_key.")]
    MissingApiKey,

    #[error("extract called without URLs")]
    NoUrls,

    #[error("Search service returned error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Search request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed search response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}
