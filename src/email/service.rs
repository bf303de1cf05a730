use async_trait::async_trait;
use lettre::{
  message::{Mailbox, MultiPart},
  transport::smtp::authentication::Credentials,
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::email::{
  error::TransportError,
  types::{Envelope, SmtpConfig, SmtpSecurity},
};

/// The one capability the relay needs from a mail transport.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait MailTransport: Send + Sync {
  /// Submit one email and return the message id assigned to it.
  async fn send(&self, envelope: &Envelope) -> Result<String, TransportError>;

  /// Connect and authenticate against the relay without sending anything.
  async fn verify(&self) -> Result<(), TransportError>;
}

pub struct EmailService {
  smtp_config: SmtpConfig,
  transporter: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
  pub fn new(smtp_config: SmtpConfig) -> Result<Self, TransportError> {
    smtp_config.from_email.parse::<Mailbox>()?;

    let creds = Credentials::new(smtp_config.username.clone(), smtp_config.password.clone());

    let builder = match smtp_config.security() {
      SmtpSecurity::ImplicitTls => AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp_config.host)?,
      SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_config.host)?,
      SmtpSecurity::Plaintext => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp_config.host),
    };

    let transporter = builder
      .credentials(creds)
      .port(smtp_config.port)
      .timeout(Some(smtp_config.timeout))
      .build();

    Ok(EmailService {
      smtp_config,
      transporter,
    })
  }

  pub fn config(&self) -> &SmtpConfig {
    &self.smtp_config
  }

  fn build_message(envelope: &Envelope) -> Result<(Message, String), TransportError> {
    let from: Mailbox = envelope.from.parse()?;
    let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

    let mut builder = Message::builder()
      .message_id(Some(message_id.clone()))
      .from(from)
      .subject(&envelope.subject);

    let mut recipients = 0;
    for recipient in envelope.recipients() {
      builder = builder.to(recipient.parse::<Mailbox>()?);
      recipients += 1;
    }
    if recipients == 0 {
      return Err(TransportError::address(format!("No recipients defined in '{}'", envelope.to)));
    }

    let message = builder.multipart(MultiPart::alternative_plain_html(
      envelope.text.clone(),
      envelope.html.clone(),
    ))?;

    Ok((message, message_id))
  }
}

#[async_trait]
impl MailTransport for EmailService {
  async fn send(&self, envelope: &Envelope) -> Result<String, TransportError> {
    let (message, message_id) = Self::build_message(envelope)?;

    match tokio::time::timeout(self.smtp_config.timeout, self.transporter.send(message)).await {
      Ok(response) => {
        response?;
        tracing::debug!("Relay accepted {}", message_id);
        Ok(message_id)
      }
      Err(_) => Err(TransportError::timeout(format!(
        "Sending timed out after {}s",
        self.smtp_config.timeout.as_secs()
      ))),
    }
  }

  async fn verify(&self) -> Result<(), TransportError> {
    match tokio::time::timeout(self.smtp_config.timeout, self.transporter.test_connection()).await {
      Ok(Ok(true)) => Ok(()),
      Ok(Ok(false)) => Err(TransportError::connection(format!(
        "{}:{} did not accept the connection",
        self.smtp_config.host, self.smtp_config.port
      ))),
      Ok(Err(err)) => Err(err.into()),
      Err(_) => Err(TransportError::timeout(format!(
        "Connection check timed out after {}s",
        self.smtp_config.timeout.as_secs()
      ))),
    }
  }
}
