//! Standardized error payloads for the tool layer.

use std::fmt;

use serde::Serialize;

use krestate_api::FetchError;

use crate::parsers::ParseError;

/// Upstream MOLIT result codes mapped to human-readable messages.
const API_ERROR_MESSAGES: &[(&str, &str)] = &[
    ("03", "No trade records found for the specified region and period."),
    ("10", "Invalid API request parameters."),
    ("22", "Daily API request limit exceeded."),
    ("30", "Unregistered API key."),
    ("31", "API key has expired."),
];

/// Error categories surfaced to tool-layer callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigError,
    InvalidInput,
    NetworkError,
    ApiError,
    ParseError,
    InternalError,
    CircuitBreakerOpen,
}

impl ErrorKind {
    /// The wire-level kind string, as serialized in error payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfigError => "config_error",
            Self::InvalidInput => "invalid_input",
            Self::NetworkError => "network_error",
            Self::ApiError => "api_error",
            Self::ParseError => "parse_error",
            Self::InternalError => "internal_error",
            Self::CircuitBreakerOpen => "circuit_breaker_open",
        }
    }
}

/// Serializable error payload returned instead of raising, for every
/// failure category: `{error, message, code?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolError {
    pub error: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ToolError {
    /// A required environment variable is missing.
    pub fn config_error(env_var: &str) -> Self {
        Self {
            error: ErrorKind::ConfigError,
            message: format!("Environment variable {env_var} is not set."),
            code: None,
        }
    }

    /// Caller-supplied input failed validation.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            error: ErrorKind::InvalidInput,
            message: message.into(),
            code: None,
        }
    }

    /// The upstream returned a recognized non-success application code.
    pub fn api_error(code: &str) -> Self {
        let message = API_ERROR_MESSAGES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, m)| (*m).to_string())
            .unwrap_or_else(|| format!("API error code: {code}"));
        Self {
            error: ErrorKind::ApiError,
            message,
            code: Some(code.to_string()),
        }
    }

    /// An upstream application error whose message comes from the payload.
    pub fn api_error_with_message(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorKind::ApiError,
            message: message.into(),
            code: Some(code.to_string()),
        }
    }

    /// A payload failed to decode.
    pub fn parse_error(format: &str, detail: impl fmt::Display) -> Self {
        Self {
            error: ErrorKind::ParseError,
            message: format!("{format} parse failed: {detail}"),
            code: None,
        }
    }

    /// An unexpected internal failure.
    pub fn internal_error(detail: impl fmt::Display) -> Self {
        Self {
            error: ErrorKind::InternalError,
            message: format!("Unexpected error: {detail}"),
            code: None,
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ToolError {}

impl From<FetchError> for ToolError {
    fn from(e: FetchError) -> Self {
        let error = match e.kind() {
            "parse_error" => ErrorKind::ParseError,
            "circuit_breaker_open" => ErrorKind::CircuitBreakerOpen,
            _ => ErrorKind::NetworkError,
        };
        Self {
            error,
            message: e.to_string(),
            code: None,
        }
    }
}

impl From<ParseError> for ToolError {
    fn from(e: ParseError) -> Self {
        Self {
            error: ErrorKind::ParseError,
            message: e.to_string(),
            code: None,
        }
    }
}
