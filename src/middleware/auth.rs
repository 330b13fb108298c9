//! ID-token verification for the token + role policy.

use axum::http::HeaderMap;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use welding_admin_firebase::{Provider, ProviderError};

/// Header carrying the operator address under the static allow-list policy.
pub const ADMIN_EMAIL_HEADER: &str = "x-admin-email";

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("no bearer token presented")]
    MissingCredential,

    /// The provider rejected the token, could not be reached, or ran out of
    /// time. All of these are treated the same by the gate.
    #[error("token verification failed: {0}")]
    Rejected(#[from] ProviderError),
}

/// Returns the bearer token from `Authorization`, if one is present and
/// non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Asks the identity provider who an ID token belongs to.
pub struct TokenVerifier<'a> {
    provider: &'a Provider,
}

impl<'a> TokenVerifier<'a> {
    pub fn new(provider: &'a Provider) -> Self {
        Self { provider }
    }

    /// Returns the subject uid of a valid token.
    pub async fn verify(&self, token: Option<&str>) -> Result<String, VerifyError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(VerifyError::MissingCredential)?;

        let uid = self
            .provider
            .call(self.provider.identity().verify_id_token(token))
            .await?;
        Ok(uid)
    }
}
