//! Identity domain events and the publish seam.
//!
//! Events are immutable facts published after a successful state change.
//! The aggregate publishes through an injected [`DomainEventPublisher`]; how
//! events travel further is the publisher's concern.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::enablement::Enablement;
use crate::person::{ContactInformation, EmailAddress, FullName};
use crate::tenant::TenantId;

/// A user registered within a tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub tenant_id: TenantId,
    pub username: String,
    pub full_name: FullName,
    pub email_address: EmailAddress,
    pub occurred_on: DateTime<Utc>,
    pub event_version: u32,
}

/// A user's password was replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPasswordChanged {
    pub tenant_id: TenantId,
    pub username: String,
    pub occurred_on: DateTime<Utc>,
    pub event_version: u32,
}

/// A user's enablement was redefined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnablementChanged {
    pub tenant_id: TenantId,
    pub username: String,
    pub enablement: Enablement,
    pub occurred_on: DateTime<Utc>,
    pub event_version: u32,
}

/// The person behind a user changed name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonNameChanged {
    pub tenant_id: TenantId,
    pub username: String,
    pub name: FullName,
    pub occurred_on: DateTime<Utc>,
    pub event_version: u32,
}

/// The person behind a user changed contact information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonContactInformationChanged {
    pub tenant_id: TenantId,
    pub username: String,
    pub contact_information: ContactInformation,
    pub occurred_on: DateTime<Utc>,
    pub event_version: u32,
}

/// Every event the identity context publishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IdentityEvent {
    UserRegistered(UserRegistered),
    UserPasswordChanged(UserPasswordChanged),
    UserEnablementChanged(UserEnablementChanged),
    PersonNameChanged(PersonNameChanged),
    PersonContactInformationChanged(PersonContactInformationChanged),
}

impl IdentityEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserRegistered(_) => "UserRegistered",
            Self::UserPasswordChanged(_) => "UserPasswordChanged",
            Self::UserEnablementChanged(_) => "UserEnablementChanged",
            Self::PersonNameChanged(_) => "PersonNameChanged",
            Self::PersonContactInformationChanged(_) => "PersonContactInformationChanged",
        }
    }

    pub fn tenant_id(&self) -> &TenantId {
        match self {
            Self::UserRegistered(e) => &e.tenant_id,
            Self::UserPasswordChanged(e) => &e.tenant_id,
            Self::UserEnablementChanged(e) => &e.tenant_id,
            Self::PersonNameChanged(e) => &e.tenant_id,
            Self::PersonContactInformationChanged(e) => &e.tenant_id,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Self::UserRegistered(e) => &e.username,
            Self::UserPasswordChanged(e) => &e.username,
            Self::UserEnablementChanged(e) => &e.username,
            Self::PersonNameChanged(e) => &e.username,
            Self::PersonContactInformationChanged(e) => &e.username,
        }
    }

    pub fn occurred_on(&self) -> DateTime<Utc> {
        match self {
            Self::UserRegistered(e) => e.occurred_on,
            Self::UserPasswordChanged(e) => e.occurred_on,
            Self::UserEnablementChanged(e) => e.occurred_on,
            Self::PersonNameChanged(e) => e.occurred_on,
            Self::PersonContactInformationChanged(e) => e.occurred_on,
        }
    }

    pub fn event_version(&self) -> u32 {
        match self {
            Self::UserRegistered(e) => e.event_version,
            Self::UserPasswordChanged(e) => e.event_version,
            Self::UserEnablementChanged(e) => e.event_version,
            Self::PersonNameChanged(e) => e.event_version,
            Self::PersonContactInformationChanged(e) => e.event_version,
        }
    }
}

/// Fire-and-forget sink for identity events.
///
/// Implementations must accept concurrent publishes from different aggregates.
/// The aggregate never observes delivery success.
pub trait DomainEventPublisher: Send + Sync {
    fn publish(&self, event: IdentityEvent);
}

/// Publisher that keeps events in memory in publish order.
///
/// Used to stage the events of one command until the caller decides to
/// forward them, and to inspect emitted events in tests.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<IdentityEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<IdentityEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<IdentityEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl DomainEventPublisher for EventRecorder {
    fn publish(&self, event: IdentityEvent) {
        self.events.lock().push(event);
    }
}
