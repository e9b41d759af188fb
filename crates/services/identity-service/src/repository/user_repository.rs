//! User repository seam and its in-process implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{AppError, AppResult};
use domain::{TenantId, User, UserIdentity};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Users are keyed by their natural identity `(tenant, username)`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a newly registered user. Fails with `Conflict` if the key is taken.
    async fn add(&self, user: User) -> AppResult<()>;

    /// Replace the stored state of an existing user
    async fn save(&self, user: User) -> AppResult<()>;

    /// Find a user by tenant and username
    async fn user_with_username(&self, tenant_id: &TenantId, username: &str)
        -> AppResult<Option<User>>;

    /// List all users of a tenant, ordered by username
    async fn all_users_of_tenant(&self, tenant_id: &TenantId) -> AppResult<Vec<User>>;
}

/// Process-local user registry
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserIdentity, User>>,
}

impl InMemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn add(&self, user: User) -> AppResult<()> {
        let mut users = self.users.write().await;
        let identity = user.identity();
        if users.contains_key(&identity) {
            return Err(AppError::conflict(format!("User {}", identity)));
        }
        users.insert(identity, user);
        Ok(())
    }

    async fn save(&self, user: User) -> AppResult<()> {
        let mut users = self.users.write().await;
        let identity = user.identity();
        match users.get_mut(&identity) {
            Some(stored) => {
                *stored = user;
                Ok(())
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn user_with_username(
        &self,
        tenant_id: &TenantId,
        username: &str,
    ) -> AppResult<Option<User>> {
        let identity = UserIdentity::new(tenant_id.clone(), username);
        Ok(self.users.read().await.get(&identity).cloned())
    }

    async fn all_users_of_tenant(&self, tenant_id: &TenantId) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users
            .values()
            .filter(|user| user.tenant_id() == tenant_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.username().cmp(b.username()));
        Ok(result)
    }
}
