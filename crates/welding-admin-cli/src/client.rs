//! HTTP client for the account administration routes.

use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use welding_admin_core::ErrorResponse;
use welding_admin_firebase::UserRecord;

/// How the client proves it is a supervisor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
    /// A Firebase ID token for an account whose role is `supervisor`.
    Bearer(String),
    /// The operator address, for servers running the static allow-list
    /// policy.
    AdminEmail(String),
}

impl Credential {
    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Credential::Bearer(token) => builder.bearer_auth(token),
            Credential::AdminEmail(email) => builder.header("x-admin-email", email),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body.
    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
        }
    }
}

/// Which account a delete request names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteBy {
    Uid(String),
    Email(String),
}

#[derive(Deserialize)]
struct UsersBody {
    users: Vec<UserRecord>,
}

#[derive(Deserialize)]
struct CreatedBody {
    uid: String,
}

#[derive(Clone, Debug)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
    credential: Credential,
}

impl AdminClient {
    pub fn new(base_url: &str, credential: Credential) -> Result<Self, ClientError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self.credential.apply(builder).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(ClientError::Api { status, message })
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ClientError> {
        let body: UsersBody = self.send(self.http.get(self.url("users"))).await?;
        Ok(body.users)
    }

    /// Returns the new account's uid.
    pub async fn create_user(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let request = self
            .http
            .post(self.url("createUser"))
            .json(&json!({ "email": email, "password": password }));
        let body: CreatedBody = self.send(request).await?;
        Ok(body.uid)
    }

    pub async fn update_email(&self, uid: &str, email: &str) -> Result<(), ClientError> {
        let request = self
            .http
            .post(self.url("updateEmail"))
            .json(&json!({ "uid": uid, "email": email }));
        let _: Value = self.send(request).await?;
        Ok(())
    }

    pub async fn update_password(&self, uid: &str, password: &str) -> Result<(), ClientError> {
        let request = self
            .http
            .post(self.url("updatePassword"))
            .json(&json!({ "uid": uid, "password": password }));
        let _: Value = self.send(request).await?;
        Ok(())
    }

    pub async fn delete_user(&self, target: &DeleteBy) -> Result<(), ClientError> {
        let body = match target {
            DeleteBy::Uid(uid) => json!({ "uid": uid }),
            DeleteBy::Email(email) => json!({ "email": email }),
        };
        let request = self.http.post(self.url("deleteUser")).json(&body);
        let _: Value = self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = AdminClient::new(
            "http://localhost:5000/",
            Credential::AdminEmail("boss@welding.example".to_string()),
        )
        .unwrap();
        assert_eq!(client.url("users"), "http://localhost:5000/api/users");
    }

    #[test]
    fn test_credentials_set_expected_headers() {
        let http = reqwest::Client::new();

        let request = Credential::Bearer("tok".to_string())
            .apply(http.get("http://localhost/"))
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer tok");

        let request = Credential::AdminEmail("boss@welding.example".to_string())
            .apply(http.get("http://localhost/"))
            .build()
            .unwrap();
        assert_eq!(request.headers()["x-admin-email"], "boss@welding.example");
    }
}
