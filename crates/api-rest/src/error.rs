//! REST error mapping.
//!
//! List endpoints always answer with their own envelope (`{interactions, error}` or
//! `{data, error}`), so a failure is rendered as an empty result plus an `error` string. Only a
//! rejected request changes the status code. Single-item endpoints use a plain `{error}` body.

use api_shared::{CheckInteractionsRes, ErrorRes, GetPrecautionsRes};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medsafe_core::SafetyError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Renders the error inside a list endpoint's envelope.
    ///
    /// Bad requests keep their 400; everything else is a 200 with an empty result.
    pub fn into_envelope<T: ErrorEnvelope>(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::OK,
        };
        (status, Json(T::failed(self.to_string()))).into_response()
    }
}

impl From<SafetyError> for ApiError {
    fn from(err: SafetyError) -> Self {
        match err {
            SafetyError::InvalidInput(msg) => ApiError::BadRequest(msg),
            SafetyError::Unresolved(_) | SafetyError::NoDataUpstream => ApiError::NotFound,
            other @ (SafetyError::Transport(_) | SafetyError::Malformed(_)) => {
                ApiError::Upstream(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::NotFound => "Not found".to_string(),
            ApiError::Upstream(detail) => {
                tracing::error!(detail = %detail, "upstream failure");
                "Failed".to_string()
            }
        };
        (status, Json(ErrorRes { error })).into_response()
    }
}

/// A list response that can carry an error in place of results.
pub trait ErrorEnvelope: Serialize {
    fn failed(error: String) -> Self;
}

impl ErrorEnvelope for CheckInteractionsRes {
    fn failed(error: String) -> Self {
        Self {
            interactions: Vec::new(),
            error: Some(error),
        }
    }
}

impl ErrorEnvelope for GetPrecautionsRes {
    fn failed(error: String) -> Self {
        Self {
            data: Vec::new(),
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&body).expect("body should be JSON")
    }

    #[test]
    fn test_safety_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(SafetyError::InvalidInput("too many".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(SafetyError::Unresolved("Xyzzyplex".into())),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(SafetyError::Transport("HTTP 503".into())),
            ApiError::Upstream(_)
        ));
        assert!(matches!(
            ApiError::from(SafetyError::Malformed("eof".into())),
            ApiError::Upstream(_)
        ));
    }

    #[tokio::test]
    async fn test_plain_error_bodies() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Not found"})
        );

        let response = ApiError::Upstream("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Failed"})
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_in_envelope_is_ok_status() {
        let response = ApiError::Upstream("RxNav returned HTTP 503".into())
            .into_envelope::<CheckInteractionsRes>();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"interactions": [], "error": "RxNav returned HTTP 503"})
        );
    }

    #[tokio::test]
    async fn test_bad_request_in_envelope_keeps_status() {
        let response =
            ApiError::BadRequest("missing field `names`".into()).into_envelope::<GetPrecautionsRes>();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["data"], serde_json::json!([]));
        assert!(body["error"].as_str().is_some());
    }
}
