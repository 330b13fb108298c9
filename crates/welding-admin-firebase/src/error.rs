use std::time::Duration;

use welding_admin_core::AppError;

/// Failures reported by, or while talking to, the identity provider or the
/// realtime database.
///
/// The `Display` output is what operators see in `{ "error": ... }`, so
/// [`ProviderError::Api`] carries the provider's own message unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider rejected the call (unknown user, duplicate email, weak
    /// password, invalid token, ...).
    #[error("{message}")]
    Api { code: String, message: String },

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider call timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("provider credential error: {0}")]
    Credential(String),

    #[error("provider configuration error: {0}")]
    Config(String),

    #[error("unexpected provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Builds an [`ProviderError::Api`] from an Identity Toolkit error
    /// string such as `WEAK_PASSWORD : Password should be at least 6
    /// characters`, using the Admin SDK wording for well-known codes.
    pub fn from_identity_toolkit(raw: &str) -> Self {
        let code = raw
            .split(|c: char| c == ' ' || c == ':')
            .next()
            .unwrap_or(raw)
            .trim()
            .to_string();

        let message = match code.as_str() {
            "USER_NOT_FOUND" => {
                "There is no user record corresponding to the provided identifier.".to_string()
            }
            "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => {
                "The email address is already in use by another account.".to_string()
            }
            "INVALID_EMAIL" => "The email address is improperly formatted.".to_string(),
            "WEAK_PASSWORD" => {
                "The password must be a string with at least 6 characters.".to_string()
            }
            "INVALID_ID_TOKEN" => {
                "Decoding Firebase ID token failed. Make sure you passed a string that represents a complete and valid JWT.".to_string()
            }
            "TOKEN_EXPIRED" => "Firebase ID token has expired.".to_string(),
            "USER_DISABLED" => "The user account has been disabled.".to_string(),
            _ => raw.trim().to_string(),
        };

        Self::Api { code, message }
    }

    pub fn user_not_found() -> Self {
        Self::from_identity_toolkit("USER_NOT_FOUND")
    }

    /// Provider code when the failure came from the provider itself.
    pub fn code(&self) -> Option<&str> {
        match self {
            ProviderError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_user_not_found(&self) -> bool {
        self.code() == Some("USER_NOT_FOUND")
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::bad_request(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_use_sdk_wording() {
        let err = ProviderError::from_identity_toolkit("USER_NOT_FOUND");
        assert!(err.is_user_not_found());
        assert_eq!(
            err.to_string(),
            "There is no user record corresponding to the provided identifier."
        );

        let err = ProviderError::from_identity_toolkit(
            "WEAK_PASSWORD : Password should be at least 6 characters",
        );
        assert_eq!(err.code(), Some("WEAK_PASSWORD"));
    }

    #[test]
    fn test_unknown_codes_pass_through_verbatim() {
        let err = ProviderError::from_identity_toolkit("QUOTA_EXCEEDED : try later");
        assert_eq!(err.code(), Some("QUOTA_EXCEEDED"));
        assert_eq!(err.to_string(), "QUOTA_EXCEEDED : try later");
    }

    #[test]
    fn test_maps_to_bad_request() {
        let app_error: AppError = ProviderError::user_not_found().into();
        assert_eq!(app_error.status.as_u16(), 400);
        assert_eq!(
            app_error.message(),
            "There is no user record corresponding to the provided identifier."
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = ProviderError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "provider call timed out after 10s");
    }
}
