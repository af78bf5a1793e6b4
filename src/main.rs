//! nexus-enroll server entry point.
//!
//! Starts the student, faculty, and admin HTTP services on their own
//! addresses, all backed by one shared application state.

use std::net::SocketAddr;

use axum::Router;
use axum::http::StatusCode;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use nexus_enroll::api;
use nexus_enroll::app_state::AppState;
use nexus_enroll::config::{EnrollConfig, LogFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = EnrollConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(
        student = %config.student_listen_addr,
        faculty = %config.faculty_listen_addr,
        admin = %config.admin_listen_addr,
        "starting nexus-enroll"
    );

    // Build application state (event bus, services, subscriptions)
    let app_state = AppState::build(&config).await;

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ));

    let student = api::student_router()
        .layer(layers.clone())
        .with_state(app_state.clone());
    let faculty = api::faculty_router()
        .layer(layers.clone())
        .with_state(app_state.clone());
    let admin = api::admin_router()
        .layer(layers)
        .with_state(app_state.clone());

    // Shutdown fan-out: Ctrl-C flips the watch, every server drains.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for shutdown signal");
            return;
        }
        tracing::info!("shutdown signal received");
        shutdown_tx.send_replace(true);
    });

    let served = tokio::try_join!(
        serve("student", config.student_listen_addr, student, shutdown_rx.clone()),
        serve("faculty", config.faculty_listen_addr, faculty, shutdown_rx.clone()),
        serve("admin", config.admin_listen_addr, admin, shutdown_rx),
    );

    app_state.event_bus.shutdown().await;
    served?;

    tracing::info!("nexus-enroll stopped");
    Ok(())
}

async fn serve(
    name: &'static str,
    addr: SocketAddr,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(service = name, addr = %addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await?;

    tracing::info!(service = name, "server stopped");
    Ok(())
}
