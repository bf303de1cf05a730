use std::{net::SocketAddr, sync::Arc};

use dotenvy::dotenv;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use mail_relay::app::create_app;
use mail_relay::config::RelayConfig;
use mail_relay::startup::{self, StartupError};
use mail_relay::state::SharedAppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let (config, email_service) = match configure().await {
    Ok(ready) => ready,
    Err(err) => {
      tracing::error!("{}", err);
      tracing::error!("{}", err.remediation());
      return Err(err.into());
    }
  };

  let app_state = SharedAppState::new(Arc::new(email_service), config.smtp.from_email.clone());
  let app = create_app(app_state);

  let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
  let listener = tokio::net::TcpListener::bind(addr).await?;

  tracing::info!("Server running on http://{}", addr);
  tracing::info!("Send endpoint: POST http://{}/send", addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

async fn configure() -> Result<(RelayConfig, mail_relay::email::EmailService), StartupError> {
  let config = RelayConfig::from_env()?;
  let email_service = startup::prepare(&config).await?;
  Ok((config, email_service))
}

async fn shutdown_signal() {
  let ctrl_c = async {
    signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
  };

  #[cfg(unix)]
  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("Failed to install signal handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
