//! Domain layer - the tenant-scoped user identity aggregate.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! no I/O, no logging, no global state. Collaborators (encryption, password
//! strength, event delivery) are injected through the traits in
//! [`password`] and [`event`].

pub mod assertion;
pub mod constants;
pub mod enablement;
pub mod error;
pub mod event;
pub mod group_member;
pub mod password;
pub mod person;
pub mod tenant;
pub mod user;

pub use constants::*;
pub use enablement::Enablement;
pub use error::{DomainError, DomainResult};
pub use event::{
    DomainEventPublisher, EventRecorder, IdentityEvent, PersonContactInformationChanged,
    PersonNameChanged, UserEnablementChanged, UserPasswordChanged, UserRegistered,
};
pub use group_member::{GroupMember, GroupMemberType};
pub use password::{
    Argon2EncryptionService, EncryptionService, PasswordPolicy, PasswordService,
    Sha256EncryptionService, StrengthPasswordService,
};
pub use person::{ContactInformation, EmailAddress, FullName, Person, Telephone};
pub use tenant::TenantId;
pub use user::{User, UserDescriptor, UserIdentity, UserResponse};
