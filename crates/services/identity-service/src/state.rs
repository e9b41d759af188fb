//! Application state for dependency injection.

use std::sync::Arc;

use crate::config::IdentityServiceConfig;
use crate::infra::BroadcastEventChannel;
use crate::service::IdentityService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: Arc<dyn IdentityService>,
    pub events: Arc<BroadcastEventChannel>,
    pub config: IdentityServiceConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        identity_service: Arc<dyn IdentityService>,
        events: Arc<BroadcastEventChannel>,
        config: IdentityServiceConfig,
    ) -> Self {
        Self {
            identity_service,
            events,
            config,
        }
    }
}
