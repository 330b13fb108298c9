use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user account as held by the identity provider.
///
/// This is the projection the admin API exposes; password hashes, salts and
/// provider tokens are never read into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// A single credential change applied to an existing account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserUpdate {
    Email(String),
    Password(String),
}

impl UserUpdate {
    pub fn field(&self) -> &'static str {
        match self {
            UserUpdate::Email(_) => "email",
            UserUpdate::Password(_) => "password",
        }
    }
}

/// The denormalized authorization record stored at `users/<uid>`.
///
/// Other fields written by the front end are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    #[serde(default)]
    pub role: Option<String>,
}

impl RoleRecord {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
        }
    }

    /// Reads a record from the raw database value, tolerating a non-string
    /// `role` field by treating it as absent.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        let role = value
            .get("role")
            .and_then(|r| r.as_str())
            .map(|r| r.to_string());
        Some(Self { role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_serializes_camel_case_without_secrets() {
        let record = UserRecord {
            uid: "u1".to_string(),
            email: Some("a@b.com".to_string()),
            created_at: None,
            last_login_at: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert!(object.contains_key("createdAt"));
        assert!(object.contains_key("lastLoginAt"));
        assert!(!object.contains_key("passwordHash"));
    }

    #[test]
    fn test_role_record_from_value() {
        assert_eq!(RoleRecord::from_value(&json!(null)), None);
        assert_eq!(
            RoleRecord::from_value(&json!({ "role": "supervisor", "name": "Sam" })),
            Some(RoleRecord::with_role("supervisor"))
        );
        assert_eq!(
            RoleRecord::from_value(&json!({ "role": 7 })),
            Some(RoleRecord { role: None })
        );
    }
}
