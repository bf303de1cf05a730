//! Startup sequence: configure, optionally verify, then hand over to the
//! listener. Any error returned here is fatal.

use thiserror::Error;

use crate::{
  config::{ConfigError, RelayConfig},
  email::{EmailService, MailTransport, TransportError},
};

#[derive(Debug, Error)]
pub enum StartupError {
  #[error("Invalid configuration: {0}")]
  Config(#[from] ConfigError),

  #[error("Could not set up the SMTP transport: {0}")]
  Transport(TransportError),

  #[error("SMTP connection failed: {0}")]
  Verification(TransportError),
}

impl StartupError {
  /// Operator guidance printed next to the error.
  pub fn remediation(&self) -> &'static str {
    match self {
      StartupError::Config(_) => {
        "Set SMTP_USER and SMTP_PASS (and optionally SMTP_HOST, SMTP_PORT, FROM_EMAIL, PORT), \
         e.g. SMTP_HOST=smtp.gmail.com SMTP_USER=you@gmail.com SMTP_PASS=<app password>"
      }
      StartupError::Transport(_) => "Check that SMTP_HOST is a valid hostname and FROM_EMAIL a valid address",
      StartupError::Verification(_) => {
        "Verify the SMTP credentials (Gmail needs an app password), make sure outbound traffic to \
         SMTP_PORT is allowed, or set SMTP_VERIFY=false to start without checking"
      }
    }
  }
}

/// Builds the transport and, when configured, checks it can reach and log
/// in to the relay.
pub async fn prepare(config: &RelayConfig) -> Result<EmailService, StartupError> {
  tracing::info!(
    "Initializing email relay: SMTP host {}:{} ({}), from {}",
    config.smtp.host,
    config.smtp.port,
    if config.smtp.implicit_tls { "implicit TLS" } else { "STARTTLS" },
    config.smtp.from_email
  );

  let email_service = EmailService::new(config.smtp.clone()).map_err(StartupError::Transport)?;

  if config.verify_before_serve {
    verify(&email_service).await?;
  } else {
    tracing::warn!("Skipping SMTP connection check (SMTP_VERIFY=false)");
  }

  Ok(email_service)
}

pub async fn verify(transport: &dyn MailTransport) -> Result<(), StartupError> {
  transport.verify().await.map_err(StartupError::Verification)?;
  tracing::info!("SMTP connection verified");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{email::TransportErrorKind, test_support::MockTransport};

  fn config(vars: &[(&str, &str)]) -> RelayConfig {
    let vars: Vec<(String, String)> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    RelayConfig::from_lookup(|key| vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())).unwrap()
  }

  #[tokio::test]
  async fn test_verify_passes_through_success() {
    let mut transport = MockTransport::new();
    transport.expect_verify().times(1).returning(|| Ok(()));

    assert!(verify(&transport).await.is_ok());
  }

  #[tokio::test]
  async fn test_verify_failure_is_fatal() {
    let mut transport = MockTransport::new();
    transport.expect_verify().times(1).returning(|| {
      Err(TransportError::new(
        TransportErrorKind::Authentication,
        "535 authentication failed",
      ))
    });

    let err = verify(&transport).await.unwrap_err();
    assert!(matches!(err, StartupError::Verification(ref e) if e.kind == TransportErrorKind::Authentication));
    assert!(err.remediation().contains("SMTP_VERIFY=false"));
  }

  #[tokio::test]
  async fn test_prepare_without_verification() {
    let config = config(&[
      ("SMTP_HOST", "localhost"),
      ("SMTP_PORT", "1025"),
      ("SMTP_USER", "me@example.com"),
      ("SMTP_PASS", "secret"),
      ("SMTP_VERIFY", "false"),
    ]);

    let email_service = prepare(&config).await.unwrap();
    assert_eq!(email_service.config().port, 1025);
  }

  #[tokio::test]
  async fn test_prepare_rejects_invalid_sender() {
    let config = config(&[
      ("SMTP_HOST", "localhost"),
      ("SMTP_USER", "not-an-address"),
      ("SMTP_PASS", "secret"),
      ("SMTP_VERIFY", "false"),
    ]);

    let err = prepare(&config).await.err().expect("invalid sender");
    assert!(matches!(err, StartupError::Transport(_)));
  }

  #[test]
  fn test_missing_credentials_remediation() {
    let err = StartupError::from(ConfigError::Missing("SMTP_USER"));
    assert_eq!(err.to_string(), "Invalid configuration: SMTP_USER environment variable must be set");
    assert!(err.remediation().contains("SMTP_USER"));
  }
}
