//! User aggregate and its projections.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assertion::{argument_length, argument_not_empty};
use crate::constants::{
    EVENT_VERSION, MAX_USERNAME_LENGTH, MSG_USERNAME_LENGTH, MSG_USERNAME_REQUIRED,
};
use crate::enablement::Enablement;
use crate::error::DomainResult;
use crate::event::{
    DomainEventPublisher, IdentityEvent, UserEnablementChanged, UserPasswordChanged,
    UserRegistered,
};
use crate::group_member::{GroupMember, GroupMemberType};
use crate::password::PasswordPolicy;
use crate::person::{ContactInformation, FullName, Person};
use crate::tenant::TenantId;

/// Natural key of a user: unique username within a tenant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserIdentity {
    tenant_id: TenantId,
    username: String,
}

impl UserIdentity {
    pub fn new(tenant_id: TenantId, username: impl Into<String>) -> Self {
        Self {
            tenant_id,
            username: username.into(),
        }
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant_id, self.username)
    }
}

/// User aggregate root.
///
/// Equality and hashing use only the natural key. `password` always holds
/// the encrypted form produced by the [`PasswordPolicy`].
#[derive(Clone)]
pub struct User {
    tenant_id: TenantId,
    username: String,
    password: String,
    enablement: Enablement,
    person: Person,
}

impl User {
    /// Register a new user.
    ///
    /// Applies the password policy with no prior password, associates the
    /// person with the new user and publishes `UserRegistered`. Nothing is
    /// published when validation fails.
    pub fn register(
        tenant_id: TenantId,
        username: impl Into<String>,
        password: &str,
        enablement: Enablement,
        mut person: Person,
        policy: &PasswordPolicy,
        publisher: &dyn DomainEventPublisher,
    ) -> DomainResult<Self> {
        let username = username.into();
        argument_not_empty(username.trim(), MSG_USERNAME_REQUIRED)?;
        argument_length(&username, 1, MAX_USERNAME_LENGTH, MSG_USERNAME_LENGTH)?;
        person.ensure_unassociated()?;

        let password = policy.protect_initial(&username, password)?;

        person.associate_with(UserIdentity::new(tenant_id.clone(), username.clone()))?;

        let user = Self {
            tenant_id,
            username,
            password,
            enablement,
            person,
        };

        publisher.publish(IdentityEvent::UserRegistered(UserRegistered {
            tenant_id: user.tenant_id.clone(),
            username: user.username.clone(),
            full_name: user.person.name().clone(),
            email_address: user.person.email_address().clone(),
            occurred_on: Utc::now(),
            event_version: EVENT_VERSION,
        }));

        Ok(user)
    }

    /// Rebuild a registered user from stored state.
    ///
    /// `encrypted_password` must already be an encryption output. No policy
    /// runs and no event is published.
    pub fn reconstitute(
        tenant_id: TenantId,
        username: impl Into<String>,
        encrypted_password: impl Into<String>,
        enablement: Enablement,
        mut person: Person,
    ) -> DomainResult<Self> {
        let username = username.into();
        let password = encrypted_password.into();
        argument_not_empty(username.trim(), MSG_USERNAME_REQUIRED)?;
        argument_not_empty(&password, "The encrypted password must be provided.")?;

        let identity = UserIdentity::new(tenant_id.clone(), username.clone());
        if person.user() != Some(&identity) {
            person.associate_with(identity)?;
        }

        Ok(Self {
            tenant_id,
            username,
            password,
            enablement,
            person,
        })
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Encrypted password
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn enablement(&self) -> &Enablement {
        &self.enablement
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.tenant_id.clone(), self.username.clone())
    }

    /// Access is permitted right now
    pub fn is_enabled(&self) -> bool {
        self.enablement.is_enablement_enabled()
    }

    /// Access is permitted at `now`
    pub fn is_enabled_at(&self, now: DateTime<Utc>) -> bool {
        self.enablement.is_currently_valid(now)
    }

    /// Replace the password after confirming the current one.
    ///
    /// Checks run in order and the first failure wins: current password
    /// present, current password confirmed, password changed, not weak, not
    /// the username. On failure the user is untouched and nothing is
    /// published.
    pub fn change_password(
        &mut self,
        current_password: &str,
        changed_password: &str,
        policy: &PasswordPolicy,
        publisher: &dyn DomainEventPublisher,
    ) -> DomainResult<()> {
        policy.confirm_current(current_password, &self.password)?;
        let encrypted = policy.protect_change(&self.username, current_password, changed_password)?;

        self.password = encrypted;

        publisher.publish(IdentityEvent::UserPasswordChanged(UserPasswordChanged {
            tenant_id: self.tenant_id.clone(),
            username: self.username.clone(),
            occurred_on: Utc::now(),
            event_version: EVENT_VERSION,
        }));

        Ok(())
    }

    /// Replace the enablement wholesale.
    pub fn define_enablement(
        &mut self,
        enablement: Enablement,
        publisher: &dyn DomainEventPublisher,
    ) {
        self.enablement = enablement;

        publisher.publish(IdentityEvent::UserEnablementChanged(UserEnablementChanged {
            tenant_id: self.tenant_id.clone(),
            username: self.username.clone(),
            enablement: self.enablement,
            occurred_on: Utc::now(),
            event_version: EVENT_VERSION,
        }));
    }

    pub fn change_personal_name(&mut self, name: FullName, publisher: &dyn DomainEventPublisher) {
        self.person.change_name(name, publisher);
    }

    pub fn change_personal_contact_information(
        &mut self,
        contact_information: ContactInformation,
        publisher: &dyn DomainEventPublisher,
    ) {
        self.person
            .change_contact_information(contact_information, publisher);
    }

    pub fn user_descriptor(&self) -> UserDescriptor {
        UserDescriptor {
            tenant_id: self.tenant_id.clone(),
            username: self.username.clone(),
            email_address: self.person.email_address().address().to_string(),
        }
    }

    pub fn to_group_member(&self) -> GroupMember {
        GroupMember::new(
            self.tenant_id.clone(),
            self.username.clone(),
            GroupMemberType::User,
        )
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.tenant_id == other.tenant_id && self.username == other.username
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tenant_id.hash(state);
        self.username.hash(state);
    }
}

// Don't expose the stored password in debug output
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("tenant_id", &self.tenant_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("enablement", &self.enablement)
            .field("person", &self.person)
            .finish()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User [tenantId={}, username={}, person={}, enablement={}]",
            self.tenant_id, self.username, self.person, self.enablement
        )
    }
}

/// Flattened external view of a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserDescriptor {
    pub tenant_id: TenantId,
    pub username: String,
    pub email_address: String,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub tenant_id: TenantId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_telephone: Option<String>,
    /// Whether access is permitted at the time the response was built
    pub enabled: bool,
    pub enablement: Enablement,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let person = user.person();
        let contact = person.contact_information();
        Self {
            tenant_id: user.tenant_id.clone(),
            username: user.username.clone(),
            first_name: person.name().first_name().to_string(),
            last_name: person.name().last_name().to_string(),
            email_address: contact.email_address().address().to_string(),
            primary_telephone: contact.primary_telephone().map(|t| t.number().to_string()),
            secondary_telephone: contact.secondary_telephone().map(|t| t.number().to_string()),
            enabled: user.is_enabled(),
            enablement: user.enablement,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::from(&user)
    }
}
