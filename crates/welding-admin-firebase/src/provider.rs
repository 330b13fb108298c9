use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::model::{RoleRecord, UserRecord, UserUpdate};

/// Largest page the identity provider returns from a single listing call.
pub const MAX_LIST_PAGE: usize = 1000;

/// Account operations delegated to the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Checks an ID token with the provider and returns its subject uid.
    async fn verify_id_token(&self, id_token: &str) -> Result<String, ProviderError>;

    /// Returns at most `max_results` accounts (capped at [`MAX_LIST_PAGE`]).
    async fn list_users(&self, max_results: usize) -> Result<Vec<UserRecord>, ProviderError>;

    async fn create_user(&self, email: &str, password: &str) -> Result<UserRecord, ProviderError>;

    async fn update_user(&self, uid: &str, update: UserUpdate) -> Result<(), ProviderError>;

    async fn delete_user(&self, uid: &str) -> Result<(), ProviderError>;

    async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, ProviderError>;
}

/// Role records kept in the realtime database under `users/<uid>`.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// `Ok(None)` when nothing is stored for `uid`.
    async fn fetch_role_record(&self, uid: &str) -> Result<Option<RoleRecord>, ProviderError>;

    /// Removing a record that does not exist succeeds.
    async fn remove_role_record(&self, uid: &str) -> Result<(), ProviderError>;
}

/// Process-wide handle on the external stores.
///
/// Built once at startup and cloned into every request; it holds no
/// per-request state and caches no identities or roles.
#[derive(Clone)]
pub struct Provider {
    identity: Arc<dyn IdentityProvider>,
    roles: Arc<dyn RoleStore>,
    deadline: Duration,
}

impl Provider {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        roles: Arc<dyn RoleStore>,
        deadline: Duration,
    ) -> Self {
        Self {
            identity,
            roles,
            deadline,
        }
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub fn roles(&self) -> &dyn RoleStore {
        self.roles.as_ref()
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Runs a provider call under the configured deadline.
    ///
    /// An elapsed deadline drops the in-flight call and reports
    /// [`ProviderError::Timeout`].
    pub async fn call<T, F>(&self, fut: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.deadline)),
        }
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
