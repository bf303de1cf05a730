use std::time::Duration;

/// Port on which relays expect TLS from the first byte instead of STARTTLS.
pub const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
  ImplicitTls,
  StartTls,
  Plaintext,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
  pub host: String,
  pub port: u16,
  pub implicit_tls: bool,
  pub username: String,
  pub password: String,
  pub from_email: String,
  pub timeout: Duration,
}

impl SmtpConfig {
  pub fn new(host: String, port: u16, username: String, password: String, from_email: String) -> Self {
    SmtpConfig {
      host,
      port,
      implicit_tls: port == IMPLICIT_TLS_PORT,
      username,
      password,
      from_email,
      timeout: Duration::from_secs(30),
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Hosts that run a local capture server without TLS.
  pub fn is_local_capture(&self) -> bool {
    self.host == "localhost" || self.host == "mailhog"
  }

  /// Port 465 always means implicit TLS, even for a local capture host.
  pub fn security(&self) -> SmtpSecurity {
    if self.implicit_tls {
      SmtpSecurity::ImplicitTls
    } else if self.is_local_capture() {
      SmtpSecurity::Plaintext
    } else {
      SmtpSecurity::StartTls
    }
  }
}

impl Default for SmtpConfig {
  fn default() -> Self {
    SmtpConfig::new(
      "smtp.gmail.com".to_string(),
      587,
      "".to_string(),
      "".to_string(),
      "".to_string(),
    )
  }
}

/// One outbound email as handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
  pub from: String,
  pub to: String,
  pub subject: String,
  pub text: String,
  pub html: String,
}

impl Envelope {
  pub fn new(from: String, to: String, subject: String, text: String) -> Self {
    let html = render_html(&text);
    Envelope {
      from,
      to,
      subject,
      text,
      html,
    }
  }

  /// Recipients of a comma-separated `to` field, blanks dropped.
  pub fn recipients(&self) -> impl Iterator<Item = &str> {
    self.to.split(',').map(str::trim).filter(|r| !r.is_empty())
  }
}

/// Plain text shown as preformatted HTML. Only angle brackets are escaped.
pub fn render_html(text: &str) -> String {
  let escaped = text.replace('<', "&lt;").replace('>', "&gt;");
  format!(
    "<pre style=\"font-family: monospace; white-space: pre-wrap;\">{}</pre>",
    escaped
  )
}
