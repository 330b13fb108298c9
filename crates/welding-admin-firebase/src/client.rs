//! REST client for Firebase Authentication and the Realtime Database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use welding_admin_config::FirebaseConfig;

use crate::credentials::TokenSource;
use crate::error::ProviderError;
use crate::model::{RoleRecord, UserRecord, UserUpdate};
use crate::provider::{IdentityProvider, MAX_LIST_PAGE, RoleStore};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    last_login_at: Option<String>,
}

impl From<AccountInfo> for UserRecord {
    fn from(info: AccountInfo) -> Self {
        UserRecord {
            uid: info.local_id,
            email: info.email,
            created_at: parse_millis(info.created_at.as_deref()),
            last_login_at: parse_millis(info.last_login_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountsResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct IdentityErrorEnvelope {
    error: IdentityErrorBody,
}

#[derive(Debug, Deserialize)]
struct IdentityErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DatabaseErrorEnvelope {
    error: String,
}

/// Provider timestamps arrive as millisecond strings (`"1700000000000"`).
fn parse_millis(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| s.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
}

/// Realtime Database keys may not be empty or contain `. $ # [ ] /`.
fn is_valid_key(uid: &str) -> bool {
    !uid.is_empty()
        && !uid
            .chars()
            .any(|c| matches!(c, '.' | '$' | '#' | '[' | ']' | '/') || c.is_control())
}

pub struct FirebaseClient {
    http: reqwest::Client,
    tokens: TokenSource,
    auth_endpoint: String,
    database_url: Url,
}

impl FirebaseClient {
    pub fn new(config: &FirebaseConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let tokens = TokenSource::new(config.service_account.clone(), http.clone())?;
        let database_url = Url::parse(&config.database_url).map_err(|e| {
            ProviderError::Config(format!(
                "invalid database URL {}: {}",
                config.database_url, e
            ))
        })?;

        Ok(Self {
            http,
            tokens,
            auth_endpoint: config.auth_endpoint.clone(),
            database_url,
        })
    }

    fn project_url(&self, action: &str) -> String {
        format!(
            "{}/v1/projects/{}/{}",
            self.auth_endpoint,
            self.tokens.project_id(),
            action
        )
    }

    fn role_url(&self, uid: &str) -> Result<Url, ProviderError> {
        let mut url = self.database_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Config("database URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("users")
            .push(&format!("{}.json", uid));
        Ok(url)
    }

    async fn send_identity<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = builder
            .bearer_auth(self.tokens.access_token().await?)
            .send()
            .await?;

        if response.status().is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::Decode(e.to_string()));
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<IdentityErrorEnvelope>(&body) {
            Ok(envelope) => Err(ProviderError::from_identity_toolkit(&envelope.error.message)),
            Err(_) => Err(ProviderError::api(status.as_str(), body)),
        }
    }

    async fn send_database(&self, builder: RequestBuilder) -> Result<Value, ProviderError> {
        let response = builder
            .bearer_auth(self.tokens.access_token().await?)
            .send()
            .await?;

        if response.status().is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|e| ProviderError::Decode(e.to_string()));
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<DatabaseErrorEnvelope>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(ProviderError::api(status.as_str(), message))
    }
}

impl std::fmt::Debug for FirebaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseClient")
            .field("auth_endpoint", &self.auth_endpoint)
            .field("database_url", &self.database_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityProvider for FirebaseClient {
    async fn verify_id_token(&self, id_token: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1/accounts:lookup", self.auth_endpoint);
        let response: AccountsResponse = self
            .send_identity(self.http.post(url).json(&json!({ "idToken": id_token })))
            .await?;

        response
            .users
            .into_iter()
            .next()
            .map(|user| user.local_id)
            .ok_or_else(|| ProviderError::from_identity_toolkit("INVALID_ID_TOKEN"))
    }

    async fn list_users(&self, max_results: usize) -> Result<Vec<UserRecord>, ProviderError> {
        let max_results = max_results.clamp(1, MAX_LIST_PAGE);
        let request = self
            .http
            .get(self.project_url("accounts:batchGet"))
            .query(&[("maxResults", max_results.to_string())]);
        let response: AccountsResponse = self.send_identity(request).await?;

        if response.next_page_token.is_some() {
            warn!(
                max_results,
                "Provider holds more accounts than one page; listing is truncated"
            );
        }

        Ok(response.users.into_iter().map(UserRecord::from).collect())
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<UserRecord, ProviderError> {
        let request = self
            .http
            .post(self.project_url("accounts"))
            .json(&json!({ "email": email, "password": password }));
        let response: SignUpResponse = self.send_identity(request).await?;

        Ok(UserRecord {
            uid: response.local_id,
            email: Some(email.to_string()),
            created_at: Some(Utc::now()),
            last_login_at: None,
        })
    }

    async fn update_user(&self, uid: &str, update: UserUpdate) -> Result<(), ProviderError> {
        let payload = match &update {
            UserUpdate::Email(email) => json!({ "localId": uid, "email": email }),
            UserUpdate::Password(password) => json!({ "localId": uid, "password": password }),
        };
        let request = self
            .http
            .post(self.project_url("accounts:update"))
            .json(&payload);
        let _: Value = self.send_identity(request).await?;
        Ok(())
    }

    async fn delete_user(&self, uid: &str) -> Result<(), ProviderError> {
        let request = self
            .http
            .post(self.project_url("accounts:delete"))
            .json(&json!({ "localId": uid }));
        let _: Value = self.send_identity(request).await?;
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, ProviderError> {
        let request = self
            .http
            .post(self.project_url("accounts:lookup"))
            .json(&json!({ "email": [email] }));
        let response: AccountsResponse = self.send_identity(request).await?;

        response
            .users
            .into_iter()
            .next()
            .map(UserRecord::from)
            .ok_or_else(ProviderError::user_not_found)
    }
}

#[async_trait]
impl RoleStore for FirebaseClient {
    async fn fetch_role_record(&self, uid: &str) -> Result<Option<RoleRecord>, ProviderError> {
        if !is_valid_key(uid) {
            return Ok(None);
        }
        let value = self.send_database(self.http.get(self.role_url(uid)?)).await?;
        Ok(RoleRecord::from_value(&value))
    }

    async fn remove_role_record(&self, uid: &str) -> Result<(), ProviderError> {
        if !is_valid_key(uid) {
            debug!(uid, "Skipping role removal for a key the database cannot hold");
            return Ok(());
        }
        self.send_database(self.http.delete(self.role_url(uid)?))
            .await?;
        Ok(())
    }
}
