//! In-memory stand-in for the identity provider and the role store.
//!
//! Behaves like the real services for the calls the admin API makes
//! (including "user not found" on repeated deletes) and counts every call so
//! tests can assert that rejected requests never reached the provider.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::ProviderError;
use crate::model::{RoleRecord, UserRecord, UserUpdate};
use crate::provider::{IdentityProvider, MAX_LIST_PAGE, RoleStore};

#[derive(Debug, Clone)]
struct StoredUser {
    record: UserRecord,
    password: String,
}

#[derive(Debug, Default)]
pub struct InMemoryFirebase {
    users: Mutex<BTreeMap<String, StoredUser>>,
    roles: Mutex<BTreeMap<String, RoleRecord>>,
    tokens: Mutex<BTreeMap<String, String>>,
    failure: Mutex<Option<ProviderFailure>>,
    operation_failures: Mutex<BTreeMap<&'static str, ProviderFailure>>,
    latency: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
struct ProviderFailure {
    code: String,
    message: String,
}

impl InMemoryFirebase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account directly, bypassing call counting.
    pub fn insert_user(&self, email: &str, password: &str) -> String {
        self.store_user(email, password).uid
    }

    fn store_user(&self, email: &str, password: &str) -> UserRecord {
        let record = UserRecord {
            uid: Uuid::new_v4().simple().to_string(),
            email: Some(email.to_string()),
            created_at: Some(Utc::now()),
            last_login_at: None,
        };
        self.users.lock().expect("users lock poisoned").insert(
            record.uid.clone(),
            StoredUser {
                record: record.clone(),
                password: password.to_string(),
            },
        );
        record
    }

    pub fn set_role(&self, uid: &str, role: &str) {
        self.roles
            .lock()
            .expect("roles lock poisoned")
            .insert(uid.to_string(), RoleRecord::with_role(role));
    }

    /// Stores a record that has no `role` field.
    pub fn set_empty_role_record(&self, uid: &str) {
        self.roles
            .lock()
            .expect("roles lock poisoned")
            .insert(uid.to_string(), RoleRecord::default());
    }

    /// Issues an ID token that verifies to `uid`.
    pub fn issue_token(&self, uid: &str) -> String {
        let token = format!("test-token-{}", Uuid::new_v4().simple());
        self.tokens
            .lock()
            .expect("tokens lock poisoned")
            .insert(token.clone(), uid.to_string());
        token
    }

    pub fn revoke_token(&self, token: &str) {
        self.tokens
            .lock()
            .expect("tokens lock poisoned")
            .remove(token);
    }

    /// Makes every subsequent call fail with the given provider error.
    pub fn fail_with(&self, code: &str, message: &str) {
        *self.failure.lock().expect("failure lock poisoned") = Some(ProviderFailure {
            code: code.to_string(),
            message: message.to_string(),
        });
    }

    /// Makes only calls to `operation` fail, e.g. `"delete_user"`. Operation
    /// names are the trait method names.
    pub fn fail_operation(&self, operation: &'static str, code: &str, message: &str) {
        self.operation_failures
            .lock()
            .expect("failure lock poisoned")
            .insert(
                operation,
                ProviderFailure {
                    code: code.to_string(),
                    message: message.to_string(),
                },
            );
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().expect("failure lock poisoned") = None;
        self.operation_failures
            .lock()
            .expect("failure lock poisoned")
            .clear();
    }

    /// Delays every subsequent call, for exercising deadlines.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().expect("latency lock poisoned") = Some(latency);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn user(&self, uid: &str) -> Option<UserRecord> {
        self.users
            .lock()
            .expect("users lock poisoned")
            .get(uid)
            .map(|u| u.record.clone())
    }

    pub fn password_of(&self, uid: &str) -> Option<String> {
        self.users
            .lock()
            .expect("users lock poisoned")
            .get(uid)
            .map(|u| u.password.clone())
    }

    pub fn role_of(&self, uid: &str) -> Option<RoleRecord> {
        self.roles
            .lock()
            .expect("roles lock poisoned")
            .get(uid)
            .cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().expect("users lock poisoned").len()
    }

    async fn enter(&self, operation: &str) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.lock().expect("latency lock poisoned");
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self
            .operation_failures
            .lock()
            .expect("failure lock poisoned")
            .get(operation)
            .cloned()
            .or_else(|| self.failure.lock().expect("failure lock poisoned").clone());
        match failure {
            Some(failure) => Err(ProviderError::api(failure.code, failure.message)),
            None => Ok(()),
        }
    }

    fn email_taken(&self, email: &str, except: Option<&str>) -> bool {
        self.users
            .lock()
            .expect("users lock poisoned")
            .values()
            .any(|u| {
                u.record.email.as_deref() == Some(email) && Some(u.record.uid.as_str()) != except
            })
    }
}

#[async_trait]
impl IdentityProvider for InMemoryFirebase {
    async fn verify_id_token(&self, id_token: &str) -> Result<String, ProviderError> {
        self.enter("verify_id_token").await?;
        self.tokens
            .lock()
            .expect("tokens lock poisoned")
            .get(id_token)
            .cloned()
            .ok_or_else(|| ProviderError::from_identity_toolkit("INVALID_ID_TOKEN"))
    }

    async fn list_users(&self, max_results: usize) -> Result<Vec<UserRecord>, ProviderError> {
        self.enter("list_users").await?;
        Ok(self
            .users
            .lock()
            .expect("users lock poisoned")
            .values()
            .take(max_results.min(MAX_LIST_PAGE))
            .map(|u| u.record.clone())
            .collect())
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<UserRecord, ProviderError> {
        self.enter("create_user").await?;
        if !email.contains('@') {
            return Err(ProviderError::from_identity_toolkit("INVALID_EMAIL"));
        }
        if self.email_taken(email, None) {
            return Err(ProviderError::from_identity_toolkit("EMAIL_EXISTS"));
        }
        Ok(self.store_user(email, password))
    }

    async fn update_user(&self, uid: &str, update: UserUpdate) -> Result<(), ProviderError> {
        self.enter("update_user").await?;
        if let UserUpdate::Email(email) = &update {
            if self.email_taken(email, Some(uid)) {
                return Err(ProviderError::from_identity_toolkit("EMAIL_EXISTS"));
            }
        }

        let mut users = self.users.lock().expect("users lock poisoned");
        let user = users.get_mut(uid).ok_or_else(ProviderError::user_not_found)?;
        match update {
            UserUpdate::Email(email) => user.record.email = Some(email),
            UserUpdate::Password(password) => user.password = password,
        }
        Ok(())
    }

    async fn delete_user(&self, uid: &str) -> Result<(), ProviderError> {
        self.enter("delete_user").await?;
        self.users
            .lock()
            .expect("users lock poisoned")
            .remove(uid)
            .map(|_| ())
            .ok_or_else(ProviderError::user_not_found)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, ProviderError> {
        self.enter("get_user_by_email").await?;
        self.users
            .lock()
            .expect("users lock poisoned")
            .values()
            .find(|u| u.record.email.as_deref() == Some(email))
            .map(|u| u.record.clone())
            .ok_or_else(ProviderError::user_not_found)
    }
}

#[async_trait]
impl RoleStore for InMemoryFirebase {
    async fn fetch_role_record(&self, uid: &str) -> Result<Option<RoleRecord>, ProviderError> {
        self.enter("fetch_role_record").await?;
        Ok(self.role_of(uid))
    }

    async fn remove_role_record(&self, uid: &str) -> Result<(), ProviderError> {
        self.enter("remove_role_record").await?;
        self.roles.lock().expect("roles lock poisoned").remove(uid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_twice_reports_user_not_found() {
        let fake = InMemoryFirebase::new();
        let uid = fake.insert_user("a@b.com", "secret1");

        fake.delete_user(&uid).await.unwrap();
        let err = fake.delete_user(&uid).await.unwrap_err();
        assert!(err.is_user_not_found());
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn test_tokens_verify_until_revoked() {
        let fake = InMemoryFirebase::new();
        let token = fake.issue_token("u1");

        assert_eq!(fake.verify_id_token(&token).await.unwrap(), "u1");
        fake.revoke_token(&token);
        assert!(fake.verify_id_token(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let fake = InMemoryFirebase::new();
        fake.create_user("a@b.com", "secret1").await.unwrap();

        let err = fake.create_user("a@b.com", "secret2").await.unwrap_err();
        assert_eq!(err.code(), Some("EMAIL_EXISTS"));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let fake = InMemoryFirebase::new();
        fake.fail_with("UNAVAILABLE", "backend down");

        let err = fake.list_users(10).await.unwrap_err();
        assert_eq!(err.to_string(), "backend down");

        fake.clear_failure();
        assert!(fake.list_users(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_operation_failure_leaves_other_calls_working() {
        let fake = InMemoryFirebase::new();
        let uid = fake.insert_user("a@b.com", "secret1");
        fake.set_role(&uid, "teacher");
        fake.fail_operation("delete_user", "INTERNAL", "delete refused");

        fake.remove_role_record(&uid).await.unwrap();
        let err = fake.delete_user(&uid).await.unwrap_err();
        assert_eq!(err.to_string(), "delete refused");
        assert!(fake.user(&uid).is_some());
        assert!(fake.role_of(&uid).is_none());

        fake.clear_failure();
        fake.delete_user(&uid).await.unwrap();
    }
}
