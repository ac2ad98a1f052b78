// Copyright 2026 Fale Relay Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the relay and their HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// All errors that can occur while serving a relay request.
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    /// The request body carried no `url`, or an empty one.
    #[error("URL is required")]
    MissingUrl,

    /// The request body could not be read as a JSON object.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The upstream fetch failed, or the URL could not be fetched at all.
    #[error("Failed to fetch content: {0}")]
    Fetch(String),
}

impl RelayError {
    /// HTTP status returned to the caller for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl | RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest's Display hides the root cause (DNS, refused, ...), so walk the chain.
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        RelayError::Fetch(message)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("request failed: {self}");
        } else {
            tracing::debug!("request rejected: {self}");
        }
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_message_and_status() {
        let err = RelayError::MissingUrl;
        assert_eq!(err.to_string(), "URL is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_fetch_error_is_server_error() {
        let err = RelayError::Fetch("dns error".to_string());
        assert!(err.to_string().starts_with("Failed to fetch content"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_body_is_client_error() {
        let err = RelayError::InvalidBody("expected value".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
