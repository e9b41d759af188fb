//! Identity handlers: user registration, views and state changes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use validator::Validate;

use common::AppResult;
use domain::{GroupMember, UserDescriptor, UserResponse};

use crate::extractors::ValidatedJson;
use crate::service::{
    ChangeUserContactInformationCommand, ChangeUserPasswordCommand,
    ChangeUserPersonalNameCommand, DefineUserEnablementCommand, EnablementInput,
    RegisterUserCommand,
};
use crate::state::AppState;

/// User registration request with validation
#[derive(Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 250, message = "Username must be 1 to 250 characters"))]
    pub username: String,
    /// Strength and emptiness are judged by the password policy
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 254, message = "Email address must be 1 to 254 characters"))]
    pub email_address: String,
    #[serde(default)]
    pub primary_telephone: Option<String>,
    #[serde(default)]
    pub secondary_telephone: Option<String>,
    /// Defaults to enabled without a time window
    #[serde(default)]
    pub enablement: Option<EnablementRequest>,
}

/// Password change request
#[derive(Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub changed_password: String,
}

/// Enablement as sent by clients, on registration and on replacement
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct EnablementRequest {
    pub enabled: bool,
    #[serde(default)]
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<EnablementRequest> for EnablementInput {
    fn from(req: EnablementRequest) -> Self {
        EnablementInput {
            enabled: req.enabled,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// Personal name change request
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeNameRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
}

/// Contact information change request
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeContactInformationRequest {
    #[validate(length(min = 1, max = 254, message = "Email address must be 1 to 254 characters"))]
    pub email_address: String,
    #[serde(default)]
    pub primary_telephone: Option<String>,
    #[serde(default)]
    pub secondary_telephone: Option<String>,
}

/// Create identity routes
pub fn identity_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/:tenant_id/users",
            get(list_users).post(register_user),
        )
        .route("/tenants/:tenant_id/users/:username", get(get_user))
        .route(
            "/tenants/:tenant_id/users/:username/descriptor",
            get(get_user_descriptor),
        )
        .route(
            "/tenants/:tenant_id/users/:username/group-member",
            get(get_group_member),
        )
        .route(
            "/tenants/:tenant_id/users/:username/password",
            put(change_password),
        )
        .route(
            "/tenants/:tenant_id/users/:username/enablement",
            put(define_enablement),
        )
        .route("/tenants/:tenant_id/users/:username/name", put(change_name))
        .route(
            "/tenants/:tenant_id/users/:username/contact-information",
            put(change_contact_information),
        )
}

/// Register a user within a tenant
pub async fn register_user(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<UserDescriptor>)> {
    let descriptor = state
        .identity_service
        .register_user(RegisterUserCommand {
            tenant_id,
            username: req.username,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            email_address: req.email_address,
            primary_telephone: req.primary_telephone,
            secondary_telephone: req.secondary_telephone,
            enablement: req
                .enablement
                .map_or_else(EnablementInput::indefinite, EnablementInput::from),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(descriptor)))
}

/// List all users of a tenant
pub async fn list_users(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.identity_service.users(&tenant_id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user
pub async fn get_user(
    State(state): State<AppState>,
    Path((tenant_id, username)): Path<(String, String)>,
) -> AppResult<Json<UserResponse>> {
    let user = state.identity_service.user(&tenant_id, &username).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn get_user_descriptor(
    State(state): State<AppState>,
    Path((tenant_id, username)): Path<(String, String)>,
) -> AppResult<Json<UserDescriptor>> {
    let descriptor = state
        .identity_service
        .user_descriptor(&tenant_id, &username)
        .await?;
    Ok(Json(descriptor))
}

pub async fn get_group_member(
    State(state): State<AppState>,
    Path((tenant_id, username)): Path<(String, String)>,
) -> AppResult<Json<GroupMember>> {
    let user = state.identity_service.user(&tenant_id, &username).await?;
    Ok(Json(user.to_group_member()))
}

/// Change a user's password
pub async fn change_password(
    State(state): State<AppState>,
    Path((tenant_id, username)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    state
        .identity_service
        .change_user_password(ChangeUserPasswordCommand {
            tenant_id,
            username,
            current_password: req.current_password,
            changed_password: req.changed_password,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Replace a user's enablement
pub async fn define_enablement(
    State(state): State<AppState>,
    Path((tenant_id, username)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<EnablementRequest>,
) -> AppResult<StatusCode> {
    state
        .identity_service
        .define_user_enablement(DefineUserEnablementCommand {
            tenant_id,
            username,
            enablement: req.into(),
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change the personal name behind a user
pub async fn change_name(
    State(state): State<AppState>,
    Path((tenant_id, username)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<ChangeNameRequest>,
) -> AppResult<StatusCode> {
    state
        .identity_service
        .change_user_personal_name(ChangeUserPersonalNameCommand {
            tenant_id,
            username,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change the contact information behind a user
pub async fn change_contact_information(
    State(state): State<AppState>,
    Path((tenant_id, username)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<ChangeContactInformationRequest>,
) -> AppResult<StatusCode> {
    state
        .identity_service
        .change_user_contact_information(ChangeUserContactInformationCommand {
            tenant_id,
            username,
            email_address: req.email_address,
            primary_telephone: req.primary_telephone,
            secondary_telephone: req.secondary_telephone,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
