//! Error types for the Pay client.
//!
//! Every failure in the SDK surfaces as a [`PayError`]; no component
//! performs silent recovery.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uniform error shape for remote responses that could not be decoded into
/// the caller's declared payload type.
///
/// This is the only non-success shape allowed to cross the dispatch
/// boundary: either a call yields the declared payload, or it fails with a
/// [`PayError`] that may carry one of these envelopes as detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Human-readable error message from the remote API or the classifier.
    pub error: String,
    /// Raw body text for non-JSON responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Declared content type of the offending response, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Error kind, mirroring the remote API's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required configuration key absent at construction.
    Configuration,
    /// Caller-supplied argument failed a precondition.
    Input,
    /// Decoded body did not match the expected shape.
    Response,
    /// Transport call could not complete.
    Network,
    /// Remote call completed but returned an error body or non-success
    /// status, including all gateway discovery failures.
    Api,
    /// Fallback.
    Unknown,
}

/// Error type for Pay client operations.
#[derive(Error, Debug, Clone)]
pub enum PayError {
    /// Missing required configuration key.
    #[error("missing required configuration key: {detail}")]
    Configuration { detail: String },

    /// Invalid input provided.
    #[error("invalid input provided: {detail}")]
    Input { detail: String },

    /// Invalid response received.
    #[error("invalid response received: {detail}")]
    Response { detail: String },

    /// Network error occurred.
    #[error("network error occurred: {detail}")]
    Network { detail: String },

    /// API error occurred.
    #[error("API error occurred: {detail}")]
    Api {
        detail: String,
        /// Classified error body, when the remote produced one.
        envelope: Option<ErrorEnvelope>,
    },

    /// An unknown error occurred.
    #[error("an unknown error occurred: {detail}")]
    Unknown { detail: String },
}

impl PayError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(detail: impl Into<String>) -> Self {
        Self::Configuration {
            detail: detail.into(),
        }
    }

    /// Create an input error.
    #[must_use]
    pub fn input(detail: impl Into<String>) -> Self {
        Self::Input {
            detail: detail.into(),
        }
    }

    /// Create a response-shape error.
    #[must_use]
    pub fn response(detail: impl Into<String>) -> Self {
        Self::Response {
            detail: detail.into(),
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    /// Create an API error without a classified body.
    #[must_use]
    pub fn api(detail: impl Into<String>) -> Self {
        Self::Api {
            detail: detail.into(),
            envelope: None,
        }
    }

    /// Create an API error carrying the classified error body.
    #[must_use]
    pub fn api_with_envelope(detail: impl Into<String>, envelope: ErrorEnvelope) -> Self {
        Self::Api {
            detail: detail.into(),
            envelope: Some(envelope),
        }
    }

    /// Create an unknown error.
    #[must_use]
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::Unknown {
            detail: detail.into(),
        }
    }

    /// Get the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Input { .. } => ErrorKind::Input,
            Self::Response { .. } => ErrorKind::Response,
            Self::Network { .. } => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Api,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Get the classified error body, if this failure carries one.
    #[must_use]
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::Api { envelope, .. } => envelope.as_ref(),
            _ => None,
        }
    }

    /// Get the HTTP status code a protocol boundary should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration { .. } | Self::Input { .. } => 400,
            Self::Response { .. } | Self::Network { .. } | Self::Api { .. } => 502,
            Self::Unknown { .. } => 500,
        }
    }
}

impl From<reqwest::Error> for PayError {
    fn from(err: reqwest::Error) -> Self {
        PayError::network(err.to_string())
    }
}
