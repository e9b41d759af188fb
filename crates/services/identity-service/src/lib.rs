//! Identity Service Library
//!
//! Tenant-scoped user registration, password protection and enablement,
//! served over HTTP. Identity events are fanned out in process.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod infra;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::IdentityServiceConfig;
use crate::infra::{spawn_event_logger, BroadcastEventChannel};
use crate::repository::InMemoryUserStore;
use crate::routes::create_router;
use crate::service::IdentityApplicationService;
use crate::state::AppState;

/// Wire repository, password policy, event channel and service for `config`.
pub fn build_state(config: IdentityServiceConfig) -> AppState {
    let events = Arc::new(BroadcastEventChannel::new(config.events.capacity));
    let repo = Arc::new(InMemoryUserStore::new());

    let identity_service = Arc::new(IdentityApplicationService::new(
        repo,
        config.password_policy(),
        events.clone(),
    ));

    AppState::new(identity_service, events, config)
}

/// Run the identity service as an embedded component.
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = IdentityServiceConfig::from_env();
    config.service.host = host.to_string();
    config.service.port = port;

    run_server_with_config(config).await
}

/// Run the HTTP server with the given configuration.
pub async fn run_server_with_config(
    config: IdentityServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.service.host, config.service.port).parse()?;
    info!(
        scheme = %config.password.scheme,
        event_capacity = config.events.capacity,
        "Starting {}",
        config.service.service_name
    );

    let state = build_state(config);
    let _event_logger = spawn_event_logger(&state.events);

    let app = create_router(state).layer(TraceLayer::new_for_http());

    info!("Identity service listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
