//! Station feed error types.

/// Errors that make the station feed unavailable for one fetch.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (connection, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check JCDECAUX_API_KEY")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not a JSON array
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Fetch did not complete in time
    #[error("feed did not respond within {secs}s")]
    Timeout { secs: u64 },

    /// Local feed file could not be read
    #[error("feed file error: {message}")]
    Io { message: String },
}
