//! Errors from the GraphQL client layer.

use andon_core::error::CoreError;
use serde::Deserialize;

/// One entry of a GraphQL response's `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
    /// Backend-supplied classification tag, e.g. `"Unauthorized"`.
    #[serde(rename = "errorType", default)]
    pub error_type: Option<String>,
}

impl std::fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_type {
            Some(error_type) => write!(f, "{error_type}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("GraphQL endpoint error ({status}): {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response carried GraphQL errors. Passed through unmodified.
    #[error("GraphQL error: {}", .0.first().map(ToString::to_string).unwrap_or_default())]
    GraphQl(Vec<GraphQlError>),

    /// The response had neither data for the operation nor errors.
    #[error("Response carried no data for {0}")]
    MissingData(String),

    /// The response data did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The input was rejected before sending.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl ApiError {
    /// The `errorType` tag of the first GraphQL error, if any.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::GraphQl(errors) => errors.first()?.error_type.as_deref(),
            _ => None,
        }
    }
}
