use crate::{ConfigError, env_opt, env_or};

/// The only role allowed through the token + role policy.
pub const SUPERVISOR_ROLE: &str = "supervisor";

/// Authorization strategy guarding the admin routes.
///
/// Selected once per deployment through `AUTH_POLICY`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Compares the `x-admin-email` header byte-for-byte against one
    /// configured address.
    ///
    /// This is the weaker mode: the header proves nothing about who sent
    /// it, so it is only safe behind a transport that callers cannot forge
    /// headers through.
    StaticAllowList { admin_email: String },

    /// Verifies the bearer ID token with the identity provider and requires
    /// the role record of its subject to equal [`SUPERVISOR_ROLE`].
    TokenRole,
}

impl AuthPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            AuthPolicy::StaticAllowList { .. } => "static_allow_list",
            AuthPolicy::TokenRole => "token_role",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub policy: AuthPolicy,
}

impl AuthConfig {
    /// Reads `AUTH_POLICY` (`token_role` by default, or `static_allow_list`)
    /// and, for the allow-list policy, `SUPER_ADMIN_EMAIL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let policy = parse_policy(
            &env_or("AUTH_POLICY", "token_role"),
            env_opt("SUPER_ADMIN_EMAIL"),
        )?;
        Ok(Self { policy })
    }

    pub fn token_role() -> Self {
        Self {
            policy: AuthPolicy::TokenRole,
        }
    }

    pub fn static_allow_list(admin_email: impl Into<String>) -> Self {
        Self {
            policy: AuthPolicy::StaticAllowList {
                admin_email: admin_email.into(),
            },
        }
    }
}

fn parse_policy(name: &str, admin_email: Option<String>) -> Result<AuthPolicy, ConfigError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "token_role" | "token-role" | "token" => Ok(AuthPolicy::TokenRole),
        "static_allow_list" | "static-allow-list" | "static" => {
            let admin_email = admin_email
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty())
                .ok_or(ConfigError::Missing("SUPER_ADMIN_EMAIL"))?;
            Ok(AuthPolicy::StaticAllowList { admin_email })
        }
        other => Err(ConfigError::Invalid {
            name: "AUTH_POLICY",
            reason: format!("unknown policy `{other}`"),
        }),
    }
}
