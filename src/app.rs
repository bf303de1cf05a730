use std::any::Any;

use axum::{response::IntoResponse, response::Response, Router};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{domains::relay::rest::relay_routes, state::SharedAppState, AppError};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .merge(relay_routes())
    .fallback(not_found_handler)
    .layer(CatchPanicLayer::custom(panic_response))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

pub async fn not_found_handler() -> AppError {
  AppError::not_found("Not found")
}

/// Turns a panicking handler into a 500 so the server keeps running.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
  let details = if let Some(message) = panic.downcast_ref::<String>() {
    message.clone()
  } else if let Some(message) = panic.downcast_ref::<&str>() {
    message.to_string()
  } else {
    "Unknown panic".to_string()
  };

  tracing::error!("Request handler panicked: {}", details);

  AppError::internal_server_error("Server error")
    .with_details(details)
    .into_response()
}
