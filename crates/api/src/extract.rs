//! Request extractors with the service's error shape.

use axum::extract::FromRequest;

use crate::error::AppError;

/// [`axum::Json`] whose rejection is reported as an [`AppError`], so a
/// malformed body gets the same `{error, code}` payload as any other 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
