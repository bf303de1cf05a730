use std::sync::Arc;

use serde_json::Value;

use crate::{
  domains::relay::{
    model::SendResponse,
    service::{RelayService, RelayServiceError, RelayServiceImpl},
  },
  email::MailTransport,
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn send_email(
    &self,
    body: Value,
  ) -> impl std::future::Future<Output = Result<SendResponse, RelayServiceError>> + Send;
}

#[derive(Clone)]
pub struct SharedAppState {
  pub relay_service: Arc<RelayServiceImpl>,
}

impl SharedAppState {
  pub fn new(transport: Arc<dyn MailTransport>, from_email: String) -> Self {
    let relay_service = Arc::new(RelayServiceImpl::new(transport, from_email));

    Self { relay_service }
  }
}

impl AppState for SharedAppState {
  async fn send_email(&self, body: Value) -> Result<SendResponse, RelayServiceError> {
    self.relay_service.send_email(body).await
  }
}
