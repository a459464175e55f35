use thiserror::Error;

/// The single failure type surfaced by the API client.
///
/// Variants exist for display purposes only; callers never branch on them to
/// retry. The rendered message is the whole contract — no stack traces.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No API key could be resolved from any configured source.
    #[error("{0}")]
    Configuration(String),

    /// The remote service answered with a non-success HTTP status.
    #[error("{api} error: {status} - {body}")]
    HttpStatus {
        /// Which endpoint failed, e.g. "Weather API" or "AI API".
        api: &'static str,
        status: u16,
        /// Response body, truncated before it gets here.
        body: String,
    },

    /// Transport-level failure: DNS, connect, timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// Transport succeeded but the payload was not what we expect.
    #[error("{0}")]
    ResponseFormat(String),
}
