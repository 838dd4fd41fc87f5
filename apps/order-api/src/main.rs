//! # Order API
//!
//! HTTP server binary for the Dillz Bites order-intake form.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use order_api::config::{ApiConfig, MailTransportKind};
use order_api::mail::{ApiMailer, MailTransport, SmtpMailer};
use order_api::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    info!("Starting order API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        enabled = config.order_form_enabled,
        transport = ?config.mail_transport,
        "Configuration loaded"
    );

    // Select the mail transport once; call sites only see the trait
    let mailer: Arc<dyn MailTransport> = match config.mail_transport {
        MailTransportKind::Api => Arc::new(ApiMailer::from_config(&config)?),
        MailTransportKind::Smtp => Arc::new(SmtpMailer::from_config(&config)?),
    };

    // Create shared state
    let state = Arc::new(AppState::new(config.clone(), mailer));

    // Build server address
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
