//! Gateway server setup
//!
//! Wires the collaborators, the hub, the REST surface and static files into
//! one router and serves it.

mod handler;
mod state;

pub use handler::{gateway_handler, DisconnectReason};
pub use state::{GatewayState, HeartbeatConfig};

use crate::hub::{ChatHub, HubConfig};
use axum::{routing::get, Router};
use chat_common::{AppConfig, AppError, FixtureConfig};
use chat_core::{EventPublisher, ParticipantRepository, UserRepository};
use chat_db::{FixtureError, MemoryMessageRepository, MemoryParticipantRepository, MemoryUserRepository};
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

/// Create the WebSocket router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/ws", get(gateway_handler))
        .route("/gateway", get(gateway_handler))
}

/// The assembled application
pub struct Application {
    pub router: Router,
    pub hub: Arc<ChatHub>,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application").field("hub", &self.hub).finish_non_exhaustive()
    }
}

/// Initialize all dependencies and build the router
pub async fn create_app(config: &AppConfig) -> Result<Application, AppError> {
    let users = Arc::new(MemoryUserRepository::new());
    let participants = Arc::new(MemoryParticipantRepository::new());
    let messages = Arc::new(MemoryMessageRepository::new());

    seed_users(&config.fixtures, users.as_ref()).await?;

    let hub = ChatHub::new_shared(
        HubConfig {
            unknown_user_policy: config.presence.unknown_user_policy,
            outbound_buffer: config.presence.outbound_buffer,
        },
        Arc::clone(&users) as Arc<dyn UserRepository>,
        Arc::clone(&participants) as Arc<dyn ParticipantRepository>,
    );

    let api_state = chat_api::AppState::new(
        messages,
        users,
        participants,
        Arc::clone(&hub) as Arc<dyn EventPublisher>,
    );
    let gateway_state = GatewayState::new(
        Arc::clone(&hub),
        HeartbeatConfig::from_millis(
            config.presence.heartbeat_interval_ms,
            config.presence.heartbeat_timeout_ms,
        ),
    );

    let router = create_router()
        .with_state(gateway_state)
        .merge(chat_api::create_app(api_state))
        .fallback_service(ServeDir::new(&config.static_files.dir));

    Ok(Application {
        router: chat_api::apply_middleware(router),
        hub,
    })
}

/// Load the user directory fixture
///
/// A missing file is only an error when the path was configured explicitly.
async fn seed_users(config: &FixtureConfig, users: &MemoryUserRepository) -> Result<usize, AppError> {
    match chat_db::load_users(&config.users_path, users).await {
        Ok(count) => Ok(count),
        Err(FixtureError::Io { path, source }) if !config.required && source.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path, "User fixture not found, starting with an empty directory");
            Ok(0)
        }
        Err(e) => Err(AppError::Fixture(e.to_string())),
    }
}

/// Periodically drop connections whose socket writer has gone away
fn spawn_registry_sweep(hub: Arc<ChatHub>, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            hub.sweep_closed_connections();
        }
    })
}

/// Serve an application on a bound listener until `shutdown` resolves
pub async fn run_server<F>(listener: TcpListener, app: Application, shutdown: F) -> Result<(), AppError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Server(format!("Failed to read local address: {e}")))?;

    tracing::info!("Listening on http://{addr} (WebSocket at ws://{addr}/ws)");

    let sweep = spawn_registry_sweep(Arc::clone(&app.hub), Duration::from_secs(30));

    let result = axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Server(format!("Server error: {e}")));

    sweep.abort();
    result
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();
    let app = create_app(&config).await?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind to {addr}: {e}")))?;

    run_server(listener, app, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
