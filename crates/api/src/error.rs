use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clubevents_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from the event service.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request body was missing, not JSON, or did not fit the shape.
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) if core.is_input_error() => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                core.to_string(),
            ),
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(core) => {
                tracing::error!(error = %core, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                rejection.body_text(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use clubevents_core::error::StoreError;

    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (CoreError::event_not_found("x"), StatusCode::NOT_FOUND),
            (
                CoreError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::InvalidId {
                    entity: "Event",
                    raw: "x".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::Store(StoreError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }
}
