//! Identity application service - use cases over the user aggregate.
//!
//! Every command runs under a per-user lock. Events raised by the aggregate
//! are staged in an [`EventRecorder`] and forwarded to the process publisher
//! only once the repository has accepted the new state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use common::{AppError, AppResult, OptionExt};
use domain::{
    ContactInformation, DomainError, DomainEventPublisher, DomainResult, EmailAddress,
    Enablement, EventRecorder, FullName, PasswordPolicy, Person, Telephone, TenantId, User,
    UserDescriptor, UserIdentity,
};

use super::commands::{
    ChangeUserContactInformationCommand, ChangeUserPasswordCommand,
    ChangeUserPersonalNameCommand, DefineUserEnablementCommand, EnablementInput,
    RegisterUserCommand,
};
use crate::repository::UserRepository;

/// Identity service trait for dependency injection.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Register a new user and return its descriptor
    async fn register_user(&self, command: RegisterUserCommand) -> AppResult<UserDescriptor>;

    /// Get a user by tenant and username
    async fn user(&self, tenant_id: &str, username: &str) -> AppResult<User>;

    /// Get the flattened descriptor of a user
    async fn user_descriptor(&self, tenant_id: &str, username: &str) -> AppResult<UserDescriptor>;

    /// List all users of a tenant
    async fn users(&self, tenant_id: &str) -> AppResult<Vec<User>>;

    /// Change a user's password
    async fn change_user_password(&self, command: ChangeUserPasswordCommand) -> AppResult<()>;

    /// Replace a user's enablement
    async fn define_user_enablement(&self, command: DefineUserEnablementCommand) -> AppResult<()>;

    /// Change the personal name behind a user
    async fn change_user_personal_name(
        &self,
        command: ChangeUserPersonalNameCommand,
    ) -> AppResult<()>;

    /// Change the contact information behind a user
    async fn change_user_contact_information(
        &self,
        command: ChangeUserContactInformationCommand,
    ) -> AppResult<()>;
}

/// One async mutex per user key, dropped again once nobody holds a lease on it.
#[derive(Default)]
struct UserLocks {
    locks: Mutex<HashMap<UserIdentity, LockEntry>>,
}

struct LockEntry {
    lock: Arc<tokio::sync::Mutex<()>>,
    leases: usize,
}

impl UserLocks {
    fn lease(&self, identity: &UserIdentity) -> UserLockLease<'_> {
        let mut locks = self.locks.lock();
        let entry = locks.entry(identity.clone()).or_insert_with(|| LockEntry {
            lock: Arc::default(),
            leases: 0,
        });
        entry.leases += 1;

        UserLockLease {
            locks: self,
            identity: identity.clone(),
            lock: entry.lock.clone(),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().len()
    }
}

/// A claim on one user's mutex. Dropping it, including when the owning
/// future is cancelled, removes the entry once the last lease is gone.
struct UserLockLease<'a> {
    locks: &'a UserLocks,
    identity: UserIdentity,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl UserLockLease<'_> {
    async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for UserLockLease<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.locks.lock();
        let idle = match locks.get_mut(&self.identity) {
            Some(entry) => {
                entry.leases = entry.leases.saturating_sub(1);
                entry.leases == 0
            }
            None => false,
        };
        if idle {
            locks.remove(&self.identity);
        }
    }
}

/// Concrete implementation of IdentityService.
pub struct IdentityApplicationService {
    repo: Arc<dyn UserRepository>,
    policy: PasswordPolicy,
    publisher: Arc<dyn DomainEventPublisher>,
    locks: UserLocks,
}

impl IdentityApplicationService {
    /// Create new identity service instance
    pub fn new(
        repo: Arc<dyn UserRepository>,
        policy: PasswordPolicy,
        publisher: Arc<dyn DomainEventPublisher>,
    ) -> Self {
        Self {
            repo,
            policy,
            publisher,
            locks: UserLocks::default(),
        }
    }

    /// Load a user, apply `change` and store the result, all under the user's lock.
    async fn modify_user<F>(
        &self,
        tenant_id: &str,
        username: &str,
        operation: &'static str,
        change: F,
    ) -> AppResult<()>
    where
        F: FnOnce(&mut User, &PasswordPolicy, &dyn DomainEventPublisher) -> DomainResult<()>
            + Send,
    {
        let tenant_id = TenantId::new(tenant_id)?;
        let identity = UserIdentity::new(tenant_id.clone(), username);

        let lease = self.locks.lease(&identity);
        let _guard = lease.lock().await;

        let mut user = self
            .repo
            .user_with_username(&tenant_id, username)
            .await?
            .ok_or_not_found()?;

        let recorder = EventRecorder::new();
        change(&mut user, &self.policy, &recorder)
            .map_err(|e| rejected(&identity, operation, e))?;

        self.repo.save(user).await?;
        self.forward(&recorder);
        info!(user = %identity, operation, "user updated");
        Ok(())
    }

    fn forward(&self, recorder: &EventRecorder) {
        for event in recorder.take() {
            debug!(event_type = event.event_type(), "forwarding identity event");
            self.publisher.publish(event);
        }
    }
}

#[async_trait]
impl IdentityService for IdentityApplicationService {
    async fn register_user(&self, command: RegisterUserCommand) -> AppResult<UserDescriptor> {
        let tenant_id = TenantId::new(command.tenant_id.as_str())?;
        let identity = UserIdentity::new(tenant_id.clone(), command.username.as_str());

        let lease = self.locks.lease(&identity);
        let _guard = lease.lock().await;

        if self
            .repo
            .user_with_username(&tenant_id, &command.username)
            .await?
            .is_some()
        {
            warn!(user = %identity, "registration rejected, username taken");
            return Err(AppError::conflict(format!("User {}", identity)));
        }

        let person = Person::new(
            FullName::new(command.first_name, command.last_name)?,
            contact_information(
                command.email_address,
                command.primary_telephone,
                command.secondary_telephone,
            )?,
        );

        let recorder = EventRecorder::new();
        let user = User::register(
            tenant_id,
            command.username,
            &command.password,
            enablement(command.enablement)?,
            person,
            &self.policy,
            &recorder,
        )
        .map_err(|e| rejected(&identity, "register", e))?;

        let descriptor = user.user_descriptor();
        self.repo.add(user).await?;
        self.forward(&recorder);
        info!(user = %identity, "user registered");
        Ok(descriptor)
    }

    async fn user(&self, tenant_id: &str, username: &str) -> AppResult<User> {
        let tenant_id = TenantId::new(tenant_id)?;
        self.repo
            .user_with_username(&tenant_id, username)
            .await?
            .ok_or_not_found()
    }

    async fn user_descriptor(&self, tenant_id: &str, username: &str) -> AppResult<UserDescriptor> {
        Ok(self.user(tenant_id, username).await?.user_descriptor())
    }

    async fn users(&self, tenant_id: &str) -> AppResult<Vec<User>> {
        let tenant_id = TenantId::new(tenant_id)?;
        self.repo.all_users_of_tenant(&tenant_id).await
    }

    async fn change_user_password(&self, command: ChangeUserPasswordCommand) -> AppResult<()> {
        let ChangeUserPasswordCommand {
            tenant_id,
            username,
            current_password,
            changed_password,
        } = command;

        self.modify_user(
            &tenant_id,
            &username,
            "change_password",
            move |user, policy, publisher| {
                user.change_password(&current_password, &changed_password, policy, publisher)
            },
        )
        .await
    }

    async fn define_user_enablement(&self, command: DefineUserEnablementCommand) -> AppResult<()> {
        let enablement = enablement(command.enablement)?;

        self.modify_user(
            &command.tenant_id,
            &command.username,
            "define_enablement",
            move |user, _, publisher| {
                user.define_enablement(enablement, publisher);
                Ok(())
            },
        )
        .await
    }

    async fn change_user_personal_name(
        &self,
        command: ChangeUserPersonalNameCommand,
    ) -> AppResult<()> {
        let name = FullName::new(command.first_name, command.last_name)?;

        self.modify_user(
            &command.tenant_id,
            &command.username,
            "change_personal_name",
            move |user, _, publisher| {
                user.change_personal_name(name, publisher);
                Ok(())
            },
        )
        .await
    }

    async fn change_user_contact_information(
        &self,
        command: ChangeUserContactInformationCommand,
    ) -> AppResult<()> {
        let contact = contact_information(
            command.email_address,
            command.primary_telephone,
            command.secondary_telephone,
        )?;

        self.modify_user(
            &command.tenant_id,
            &command.username,
            "change_contact_information",
            move |user, _, publisher| {
                user.change_personal_contact_information(contact, publisher);
                Ok(())
            },
        )
        .await
    }
}

fn rejected(identity: &UserIdentity, operation: &str, err: DomainError) -> AppError {
    warn!(user = %identity, operation, code = err.code(), "command rejected: {}", err);
    err.into()
}

fn enablement(input: EnablementInput) -> DomainResult<Enablement> {
    Enablement::new(input.enabled, input.start_date, input.end_date)
}

fn contact_information(
    email_address: String,
    primary_telephone: Option<String>,
    secondary_telephone: Option<String>,
) -> DomainResult<ContactInformation> {
    let telephone = |number: Option<String>| {
        number
            .filter(|n| !n.trim().is_empty())
            .map(Telephone::new)
            .transpose()
    };

    Ok(ContactInformation::new(
        EmailAddress::new(email_address)?,
        telephone(primary_telephone)?,
        telephone(secondary_telephone)?,
    ))
}
