//! Application commands accepted by the identity service.
//!
//! Commands carry raw input; the service turns it into domain values so that
//! every validation failure surfaces as a domain error.

use std::fmt;

use chrono::{DateTime, Utc};

/// Register a new user within a tenant
#[derive(Clone)]
pub struct RegisterUserCommand {
    pub tenant_id: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub primary_telephone: Option<String>,
    pub secondary_telephone: Option<String>,
    pub enablement: EnablementInput,
}

// Don't expose the password in debug output
impl fmt::Debug for RegisterUserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUserCommand")
            .field("tenant_id", &self.tenant_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .field("enablement", &self.enablement)
            .finish_non_exhaustive()
    }
}

/// Enablement as supplied by a caller
#[derive(Debug, Clone, Copy)]
pub struct EnablementInput {
    pub enabled: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl EnablementInput {
    /// Enabled without a validity window
    pub fn indefinite() -> Self {
        Self {
            enabled: true,
            start_date: None,
            end_date: None,
        }
    }
}

/// Replace a user's password
#[derive(Clone)]
pub struct ChangeUserPasswordCommand {
    pub tenant_id: String,
    pub username: String,
    pub current_password: String,
    pub changed_password: String,
}

impl fmt::Debug for ChangeUserPasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeUserPasswordCommand")
            .field("tenant_id", &self.tenant_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Redefine a user's enablement
#[derive(Debug, Clone)]
pub struct DefineUserEnablementCommand {
    pub tenant_id: String,
    pub username: String,
    pub enablement: EnablementInput,
}

/// Change the name of the person behind a user
#[derive(Debug, Clone)]
pub struct ChangeUserPersonalNameCommand {
    pub tenant_id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Change the contact information of the person behind a user
#[derive(Debug, Clone)]
pub struct ChangeUserContactInformationCommand {
    pub tenant_id: String,
    pub username: String,
    pub email_address: String,
    pub primary_telephone: Option<String>,
    pub secondary_telephone: Option<String>,
}
