//! Authorization gate in front of every account-administration route.
//!
//! The gate runs before any handler and before any account operation
//! reaches the provider. A request either leaves it with a [`Supervisor`]
//! in its extensions or is answered here with 401 or 403.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};
use welding_admin_config::{AuthPolicy, SUPERVISOR_ROLE};
use welding_admin_core::AppError;
use welding_admin_firebase::Provider;
use welding_admin_observability::AuditSubject;

use crate::middleware::auth::{ADMIN_EMAIL_HEADER, TokenVerifier, VerifyError, bearer_token};
use crate::middleware::role::RoleResolver;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing auth token")]
    MissingCredential,

    #[error("Not authorized")]
    NotAuthorized,

    #[error("Invalid or expired token")]
    VerificationFailed,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential => StatusCode::UNAUTHORIZED,
            AuthError::NotAuthorized | AuthError::VerificationFailed => StatusCode::FORBIDDEN,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::new(err.status(), err)
    }
}

/// The operator a request was admitted for.
///
/// Inserted into request extensions by [`require_supervisor`]; extracting it
/// in a handler that sits outside the gate fails closed with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supervisor {
    /// Verified uid under the token policy, the presented address under the
    /// allow-list policy.
    pub subject: String,
}

impl<S> FromRequestParts<S> for Supervisor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Supervisor>()
            .cloned()
            .ok_or_else(|| AuthError::MissingCredential.into())
    }
}

pub struct AuthorizationGate<'a> {
    policy: &'a AuthPolicy,
    provider: &'a Provider,
}

impl<'a> AuthorizationGate<'a> {
    pub fn new(policy: &'a AuthPolicy, provider: &'a Provider) -> Self {
        Self { policy, provider }
    }

    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Supervisor, AuthError> {
        match self.policy {
            AuthPolicy::TokenRole => self.authorize_token_role(headers).await,
            AuthPolicy::StaticAllowList { admin_email } => {
                authorize_allow_list(headers, admin_email)
            }
        }
    }

    async fn authorize_token_role(&self, headers: &HeaderMap) -> Result<Supervisor, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingCredential)?;

        let uid = TokenVerifier::new(self.provider)
            .verify(Some(&token))
            .await
            .map_err(|err| match err {
                VerifyError::MissingCredential => AuthError::MissingCredential,
                VerifyError::Rejected(source) => {
                    warn!(error = %source, "ID token verification failed");
                    AuthError::VerificationFailed
                }
            })?;

        let lookup = RoleResolver::new(self.provider)
            .resolve(&uid)
            .await
            .map_err(|err| {
                warn!(uid = %uid, error = %err, "Role lookup failed");
                AuthError::VerificationFailed
            })?;

        if !lookup.is(SUPERVISOR_ROLE) {
            return Err(AuthError::NotAuthorized);
        }

        Ok(Supervisor { subject: uid })
    }
}

fn authorize_allow_list(headers: &HeaderMap, admin_email: &str) -> Result<Supervisor, AuthError> {
    let presented = headers
        .get(ADMIN_EMAIL_HEADER)
        .ok_or(AuthError::MissingCredential)?;

    if presented.as_bytes() != admin_email.as_bytes() {
        return Err(AuthError::NotAuthorized);
    }

    Ok(Supervisor {
        subject: admin_email.to_string(),
    })
}

/// Middleware admitting only supervisors; install with
/// `route_layer(middleware::from_fn_with_state(state, require_supervisor))`.
pub async fn require_supervisor(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let gate = AuthorizationGate::new(&state.auth_config.policy, &state.provider);

    let outcome = gate.authorize(req.headers()).await;

    match outcome {
        Ok(supervisor) => {
            let subject = AuditSubject(supervisor.subject.clone());
            req.extensions_mut().insert(supervisor);

            let mut response = next.run(req).await;
            response.extensions_mut().insert(subject);
            response
        }
        Err(err) => {
            info!(
                policy = state.auth_config.policy.name(),
                path = %req.uri().path(),
                reason = ?err,
                "Request rejected"
            );
            AppError::from(err).into_response()
        }
    }
}
