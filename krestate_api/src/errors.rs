//! Error types for the fetch core.

/// Errors that can occur when fetching from an upstream endpoint.
///
/// Every failure is reported as a value; nothing in the fetch path panics.
/// [`FetchError::kind`] gives the wire-level category used in serialized
/// error payloads.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Every attempt timed out or failed to connect.
    #[error("API server timed out after {attempts} attempts. Please try again later.")]
    RetriesExhausted { attempts: u32 },
    /// The upstream returned a non-2xx status. Never retried.
    #[error("HTTP error: {status}")]
    HttpStatus { status: u16 },
    /// A request failed for a non-retryable transport reason.
    #[error("Network error: {0}")]
    Network(String),
    /// A 2xx response carried a body that failed to decode. Never retried
    /// and never counted against the circuit breaker.
    #[error("JSON parse failed: {0}")]
    Parse(String),
    /// The circuit breaker rejected the call before any network attempt.
    #[error(
        "API requests are temporarily blocked due to repeated failures. \
         Please try again in a few moments."
    )]
    CircuitOpen,
}

impl FetchError {
    /// The error category as it appears in serialized error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RetriesExhausted { .. } | Self::HttpStatus { .. } | Self::Network(_) => {
                "network_error"
            }
            Self::Parse(_) => "parse_error",
            Self::CircuitOpen => "circuit_breaker_open",
        }
    }
}
