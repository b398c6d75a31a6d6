//! Error taxonomy for the relay layer.
//!
//! Every failure is caught in the handler and rendered as the JSON error
//! envelope; nothing propagates to a framework-level handler, so callers
//! always see a well-formed body with a status in {200, 400, 500}.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::envelope::ErrorEnvelope;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A required query parameter was absent (or empty).
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),
    /// A query parameter carried a literal outside its vocabulary.
    #[error("invalid value `{value}` for parameter `{name}`")]
    InvalidParameter {
        name: &'static str,
        value: String,
    },
    /// The single upstream fetch behind this route failed.
    #[error("upstream fetch failed: {0}")]
    Upstream(#[from] ashare_api::Error),
    /// Every source in a fallback chain failed; the message lists each
    /// attempt's failure.
    #[error("all data sources failed: {0}")]
    AllSourcesFailed(String),
}

impl RelayError {
    fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingParameter(_) | RelayError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            RelayError::Upstream(_) | RelayError::AllSourcesFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn trace(&self) -> Option<String> {
        match self {
            RelayError::Upstream(e) => Some(format!("{:?}", e)),
            _ => None,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let envelope = ErrorEnvelope {
            error: self.to_string(),
            trace: self.trace(),
        };
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_is_a_client_error_naming_the_parameter() {
        let err = RelayError::MissingParameter("symbol");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("symbol"));
    }

    #[test]
    fn upstream_failures_are_server_errors_with_a_trace() {
        let err = RelayError::Upstream(ashare_api::Error::RequestFailed);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.trace().is_some());
    }
}
