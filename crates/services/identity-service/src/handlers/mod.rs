//! HTTP handlers.

mod health_handler;
mod identity_handler;

pub use health_handler::{health_check, health_routes, HealthResponse};
pub use identity_handler::{
    identity_routes, ChangeContactInformationRequest, ChangeNameRequest, ChangePasswordRequest,
    EnablementRequest, RegisterUserRequest,
};
