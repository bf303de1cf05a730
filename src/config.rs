use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

use crate::email::SmtpConfig;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_LISTEN_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("{0} environment variable must be set")]
  Missing(&'static str),

  #[error("{name} has an invalid value: {value:?}")]
  Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
  pub smtp: SmtpConfig,
  pub listen_port: u16,
  /// Check the relay connection and credentials before accepting requests.
  pub verify_before_serve: bool,
}

impl RelayConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Reads every setting through `lookup`. Empty values count as unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

    let username = get("SMTP_USER").ok_or(ConfigError::Missing("SMTP_USER"))?;
    let password = get("SMTP_PASS").ok_or(ConfigError::Missing("SMTP_PASS"))?;
    let host = get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
    let from_email = get("FROM_EMAIL").unwrap_or_else(|| username.clone());

    let port = parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?;
    let listen_port = parse_or("PORT", get("PORT"), DEFAULT_LISTEN_PORT)?;
    let timeout_secs = parse_or("SMTP_TIMEOUT_SECS", get("SMTP_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
    let verify_before_serve = match get("SMTP_VERIFY") {
      Some(value) => parse_flag("SMTP_VERIFY", &value)?,
      None => true,
    };

    let smtp = SmtpConfig::new(host, port, username, password, from_email)
      .with_timeout(Duration::from_secs(timeout_secs));

    Ok(RelayConfig {
      smtp,
      listen_port,
      verify_before_serve,
    })
  }
}

fn parse_or<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
  match value {
    Some(value) => value
      .trim()
      .parse()
      .map_err(|_| ConfigError::Invalid { name, value }),
    None => Ok(default),
  }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    _ => Err(ConfigError::Invalid {
      name,
      value: value.to_string(),
    }),
  }
}
