use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::model::{SendRequest, SendResponse, REQUIRED_FIELDS};
use crate::email::{Envelope, MailTransport, TransportError};

#[derive(Debug, Error)]
pub enum RelayServiceError {
  #[error("Missing required fields (received: {received:?})")]
  MissingFields {
    required: Vec<&'static str>,
    received: Vec<String>,
  },

  #[error("Failed to send email: {0}")]
  Transport(#[from] TransportError),
}

#[async_trait]
pub trait RelayService: Send + Sync {
  async fn send_email(&self, body: Value) -> Result<SendResponse, RelayServiceError>;
}

pub struct RelayServiceImpl {
  transport: Arc<dyn MailTransport>,
  from_email: String,
}

impl RelayServiceImpl {
  pub fn new(transport: Arc<dyn MailTransport>, from_email: String) -> Self {
    Self { transport, from_email }
  }
}

#[async_trait]
impl RelayService for RelayServiceImpl {
  async fn send_email(&self, body: Value) -> Result<SendResponse, RelayServiceError> {
    let request = SendRequest::from_json(&body).map_err(|received| RelayServiceError::MissingFields {
      required: REQUIRED_FIELDS.to_vec(),
      received,
    })?;

    tracing::info!("Sending email to {} (subject: {})", request.to, request.subject);

    let envelope = Envelope::new(self.from_email.clone(), request.to, request.subject, request.text);

    match self.transport.send(&envelope).await {
      Ok(message_id) => {
        tracing::info!("Email sent to {}, id {}", envelope.to, message_id);
        Ok(SendResponse::sent(message_id))
      }
      Err(err) => {
        tracing::error!("Failed to send email to {} ({}): {}", envelope.to, err.kind, err.detail);
        Err(err.into())
      }
    }
  }
}
