use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::{Map, Value};

use crate::{domains::relay::service::RelayServiceError, email::TransportErrorKind};

#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
  /// Extra members merged into the JSON body next to `error`.
  pub fields: Map<String, Value>,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
      fields: Map::new(),
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(StatusCode::NOT_FOUND, message)
  }

  pub fn internal_server_error(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }

  pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
    self.fields.insert(key.to_string(), value.into());
    self
  }

  pub fn with_details(self, details: impl Into<String>) -> Self {
    self.with("details", details.into())
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let mut body = Map::new();
    body.insert("error".to_string(), Value::String(self.message));
    body.extend(self.fields);

    (self.status_code, Json(Value::Object(body))).into_response()
  }
}

impl From<AppError> for StatusCode {
  fn from(err: AppError) -> Self {
    err.status_code
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    tracing::warn!("Rejected request body: {}", rejection.body_text());
    AppError::bad_request("Invalid JSON format").with_details(rejection.body_text())
  }
}

impl From<RelayServiceError> for AppError {
  fn from(error: RelayServiceError) -> Self {
    match error {
      RelayServiceError::MissingFields { required, received } => AppError::bad_request("Missing required fields")
        .with("required", required)
        .with("received", received),
      RelayServiceError::Transport(err) => {
        let app_error = AppError::internal_server_error("Failed to send email").with_details(err.detail);
        if err.kind == TransportErrorKind::Authentication {
          app_error.with("hint", "Check SMTP credentials; some providers require an app password")
        } else {
          app_error
        }
      }
    }
  }
}
