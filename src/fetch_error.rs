/// Error classification for content API fetches.
/// Provides structured failure types so listing pages can pick the right
/// message and recovery affordance (retry vs. fix configuration).
use serde::{Deserialize, Serialize};

/// Classified failure kinds a fetch can produce
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Request never completed (offline, DNS, timeout)
    Network,
    /// Server answered with a non-success HTTP status
    Status,
    /// Body received but it violates the envelope contract
    /// (undecodable JSON, or `data` is not an array)
    Contract,
    /// Envelope received with its success flag set to false
    Api,
    /// Required configuration is missing (base URL, feed URLs)
    Config,
}

/// Typed failure returned by every fetcher; never allowed to escape as a panic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

const GENERIC_API_FAILURE: &str = "The content service rejected the request.";

impl FetchError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            message: err.to_string(),
        }
    }

    pub fn status(code: reqwest::StatusCode) -> Self {
        Self {
            kind: FetchErrorKind::Status,
            message: format!("API Error: {}", code.as_u16()),
        }
    }

    pub fn contract(msg: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Contract,
            message: msg.into(),
        }
    }

    /// Failure reported by the envelope itself. Uses the API's own message
    /// when it sent one, otherwise a generic fallback string.
    pub fn api(message: Option<String>) -> Self {
        Self {
            kind: FetchErrorKind::Api,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_API_FAILURE.to_string()),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Config,
            message: msg.into(),
        }
    }

    /// Classify a reqwest error. Status errors keep their code; everything
    /// else (connect, timeout, body read) counts as a transport failure.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(code) = err.status() {
            return Self::status(code);
        }
        if err.is_decode() {
            return Self::contract(err.to_string());
        }
        Self::network(err)
    }

    /// Whether a plain user-triggered retry makes sense for this failure
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind, FetchErrorKind::Config)
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}
