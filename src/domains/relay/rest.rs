use axum::{
  body::Bytes,
  extract::{rejection::JsonRejection, Json, State},
  http::{header, HeaderMap},
  response::Json as JsonResponse,
  routing::{get, post},
  Router,
};
use serde_json::{Map, Value};

use super::model::{HealthResponse, SendResponse, SEND_PATH};
use crate::{
  state::{AppState, SharedAppState},
  AppError,
};

pub fn relay_routes() -> Router<SharedAppState> {
  Router::new()
    .route("/", get(health_handler))
    .route(SEND_PATH, post(send_handler))
}

pub async fn health_handler() -> JsonResponse<HealthResponse> {
  JsonResponse(HealthResponse::default())
}

pub async fn send_handler(
  State(state): State<SharedAppState>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<JsonResponse<SendResponse>, AppError> {
  let body = decode_body(&headers, &body)?;

  state.send_email(body).await.map(JsonResponse).map_err(Into::into)
}

/// A missing body or a non-JSON content type reads as an empty object, so the
/// caller gets the missing-fields answer. Only JSON that fails to parse is
/// rejected here.
fn decode_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, JsonRejection> {
  if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
    return Ok(Value::Object(Map::new()));
  }

  let Json(value) = Json::<Value>::from_bytes(body)?;
  Ok(value)
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
  let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|value| value.to_str().ok()) else {
    return false;
  };

  let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
  essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}
