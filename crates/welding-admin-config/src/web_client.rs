use serde::Serialize;
use utoipa::ToSchema;

use crate::env_opt;
use crate::firebase::DEFAULT_DATABASE_URL;

/// Public configuration handed to the browser SDK by `/api/firebaseConfig`.
///
/// None of these values are secrets; unset fields are omitted from the JSON.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebClientConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    #[serde(rename = "databaseURL", skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,
}

impl WebClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_opt("FIREBASE_API_KEY"),
            auth_domain: env_opt("FIREBASE_AUTH_DOMAIN"),
            database_url: env_opt("FIREBASE_DATABASE_URL")
                .or_else(|| Some(DEFAULT_DATABASE_URL.to_string())),
            project_id: env_opt("FIREBASE_PROJECT_ID"),
            storage_bucket: env_opt("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: env_opt("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: env_opt("FIREBASE_APP_ID"),
            measurement_id: env_opt("FIREBASE_MEASUREMENT_ID"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_sdk_field_names() {
        let config = WebClientConfig {
            api_key: Some("key".to_string()),
            database_url: Some("https://db".to_string()),
            project_id: Some("welding-form".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["apiKey"], "key");
        assert_eq!(value["databaseURL"], "https://db");
        assert_eq!(value["projectId"], "welding-form");
        assert!(value.get("appId").is_none());
    }
}
