//! Outbound mail transport.
//!
//! [`MailTransport`] is the seam the HTTP layer talks to; [`EmailService`]
//! implements it on top of lettre's pooled async SMTP transport.

mod error;
mod service;
mod types;

pub use error::{TransportError, TransportErrorKind};
pub use service::{EmailService, MailTransport};
pub use types::{render_html, Envelope, SmtpConfig, SmtpSecurity, IMPLICIT_TLS_PORT};
