//! Error types for configuration service calls.

use thiserror::Error;

use crate::transport::HttpError;

/// Error type for calls to the configuration service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    /// The server rejected the request signature or access key.
    #[error("Request rejected with status {status}, check the access key secret")]
    Unauthorized {
        /// HTTP status code (401 or 403)
        status: http::StatusCode,
    },

    /// The server answered with a status the call does not expect.
    #[error("Unexpected status {status}{}", .body.as_ref().map(|b| format!(": {b}")).unwrap_or_default())]
    UnexpectedStatus {
        /// HTTP status code
        status: http::StatusCode,
        /// Response body, if it was valid UTF-8
        body: Option<String>,
    },

    /// The response body was not the expected JSON.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built from the configured base URL.
    #[error("Cannot build request URL from '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// Classifies a non-success response.
    #[must_use]
    pub fn from_status(status: http::StatusCode, body: Option<&str>) -> Self {
        if status == http::StatusCode::UNAUTHORIZED || status == http::StatusCode::FORBIDDEN {
            Self::Unauthorized { status }
        } else {
            Self::UnexpectedStatus {
                status,
                body: body.map(ToString::to_string),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn unauthorized_for_401_and_403() {
        for code in [401, 403] {
            let status = http::StatusCode::from_u16(code).unwrap();
            assert!(matches!(
                ApiError::from_status(status, None),
                ApiError::Unauthorized { .. }
            ));
        }
    }

    #[test]
    fn unexpected_status_keeps_body() {
        let error = ApiError::from_status(http::StatusCode::INTERNAL_SERVER_ERROR, Some("boom"));

        assert_eq!(error.to_string(), "Unexpected status 500 Internal Server Error: boom");
    }

    #[test]
    fn unexpected_status_without_body() {
        let error = ApiError::from_status(http::StatusCode::NOT_FOUND, None);

        assert_eq!(error.to_string(), "Unexpected status 404 Not Found");
    }

    #[test]
    fn http_error_preserves_source() {
        let error: ApiError = HttpError::Timeout.into();

        assert!(error.to_string().contains("timed out"));
        assert!(error.source().is_some());
    }
}
