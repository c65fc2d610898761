//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Any `AppError` converts with `?`
//! and renders as `{ "error": ..., "code"?: ..., "stack"?: ... }` with the status from
//! [`ErrorMetadata`].

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use harvest_core::{AppError, ErrorMetadata, LogLevel};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Diagnostic code from the failing store, or `UNKNOWN`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Error chain; only for unexpected failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            stack: None,
        }
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let stack = match err {
            AppError::Unexpected { .. } => Some(err.detailed_message()),
            _ => None,
        };
        Self {
            error: err.client_message(),
            code: err.diagnostic_code(),
            stack,
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from harvest-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// Convert JSON body failures into a 400, or a 413 when a streamed body hits the size limit.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpAppError(AppError::PayloadTooLarge(rejection.body_text()));
        }
        HttpAppError(AppError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that renders deserialization failures in the `ErrorResponse` shape.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.diagnostic_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code = ?code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code = ?code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type,
                code = ?code,
                "Request failed"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(ErrorResponse::from(app_error))).into_response()
    }
}

/// Re-render a 413 produced outside the handlers (the body limit layer answers in
/// plain text) in the `ErrorResponse` shape.
pub async fn json_payload_too_large(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return HttpAppError(AppError::PayloadTooLarge(
            "rejected by request body limit".to_string(),
        ))
        .into_response();
    }
    response
}

/// Render a panic caught by `CatchPanicLayer` as an unexpected error.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    HttpAppError(AppError::from(anyhow::anyhow!("panic: {}", message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_has_no_code() {
        let err = AppError::Validation("Missing required fields: weight".to_string());
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error": "Missing required fields: weight" })
        );
    }

    #[test]
    fn test_store_errors_carry_code() {
        let err = AppError::Configuration {
            message: "relation \"documents\" does not exist".to_string(),
            code: "42P01".to_string(),
        };
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code.as_deref(), Some("42P01"));
        assert!(body.error.starts_with("Database configuration error"));
        assert!(body.stack.is_none());
    }

    #[test]
    fn test_unexpected_errors_include_stack() {
        let err = AppError::from(anyhow::anyhow!("socket closed").context("writing record"));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code.as_deref(), Some("UNKNOWN"));
        assert!(body.stack.unwrap().contains("socket closed"));
    }

    #[test]
    fn test_status_codes() {
        let response =
            HttpAppError(AppError::InvalidTimestamp("nope".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = HttpAppError(AppError::Connectivity {
            message: "refused".to_string(),
            code: "UNAVAILABLE".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_plain_413_is_rewritten_as_json() {
        let plain = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();
        let response = json_payload_too_large(plain).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let ok = (StatusCode::OK, "fine").into_response();
        assert_eq!(json_payload_too_large(ok).await.status(), StatusCode::OK);
    }

    #[test]
    fn test_panic_response_is_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(String::from("owned boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
