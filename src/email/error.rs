use std::fmt;

use lettre::transport::smtp;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
  /// Sender or recipient could not be parsed as a mailbox.
  Address,
  /// The message could not be assembled.
  Build,
  /// The relay refused the credentials.
  Authentication,
  /// Network or TLS failure talking to the relay.
  Connection,
  /// The relay answered with an error reply.
  Rejected,
  Timeout,
}

impl fmt::Display for TransportErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TransportErrorKind::Address => "address",
      TransportErrorKind::Build => "build",
      TransportErrorKind::Authentication => "authentication",
      TransportErrorKind::Connection => "connection",
      TransportErrorKind::Rejected => "rejected",
      TransportErrorKind::Timeout => "timeout",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{detail}")]
pub struct TransportError {
  pub kind: TransportErrorKind,
  pub detail: String,
}

impl TransportError {
  pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
    Self {
      kind,
      detail: detail.into(),
    }
  }

  pub fn address(detail: impl Into<String>) -> Self {
    Self::new(TransportErrorKind::Address, detail)
  }

  pub fn connection(detail: impl Into<String>) -> Self {
    Self::new(TransportErrorKind::Connection, detail)
  }

  pub fn timeout(detail: impl Into<String>) -> Self {
    Self::new(TransportErrorKind::Timeout, detail)
  }
}

/// SMTP reply codes that mean the credentials were refused.
const AUTH_FAILURE_CODES: [&str; 3] = ["530", "534", "535"];

impl From<smtp::Error> for TransportError {
  fn from(err: smtp::Error) -> Self {
    let kind = if err.is_timeout() {
      TransportErrorKind::Timeout
    } else if err.is_tls() {
      TransportErrorKind::Connection
    } else if let Some(code) = err.status() {
      if AUTH_FAILURE_CODES.contains(&code.to_string().as_str()) {
        TransportErrorKind::Authentication
      } else {
        TransportErrorKind::Rejected
      }
    } else if err.is_client() {
      TransportErrorKind::Build
    } else {
      TransportErrorKind::Connection
    };

    TransportError::new(kind, err.to_string())
  }
}

impl From<lettre::address::AddressError> for TransportError {
  fn from(err: lettre::address::AddressError) -> Self {
    TransportError::address(err.to_string())
  }
}

impl From<lettre::error::Error> for TransportError {
  fn from(err: lettre::error::Error) -> Self {
    TransportError::new(TransportErrorKind::Build, err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_is_detail_only() {
    let err = TransportError::connection("connection refused");
    assert_eq!(err.to_string(), "connection refused");
    assert_eq!(err.kind, TransportErrorKind::Connection);
  }

  #[test]
  fn test_address_error_maps_to_address_kind() {
    let parse_err = "not an address".parse::<lettre::Address>().unwrap_err();
    let err = TransportError::from(parse_err);
    assert_eq!(err.kind, TransportErrorKind::Address);
    assert!(!err.detail.is_empty());
  }
}
