//! Response types for the web API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use funnel_engine::FunnelError;

/// JSON body of every failed API request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
    }
  }
}

/// A report query failure, rendered as `ErrorOutput` with a fitting status.
#[derive(Debug)]
pub struct ApiError(pub FunnelError);

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match &self.0 {
      FunnelError::NotLoaded(_) | FunnelError::EmptyLog(_) => StatusCode::SERVICE_UNAVAILABLE,
      FunnelError::UnknownStep(_) => StatusCode::NOT_FOUND,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<FunnelError> for ApiError {
  fn from(e: FunnelError) -> Self {
    Self(e)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status(), Json(ErrorOutput::new(self.0.to_string()))).into_response()
  }
}
