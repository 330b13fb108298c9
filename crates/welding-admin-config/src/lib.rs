//! # Welding Admin Config
//!
//! Configuration types for the admin API, each loaded from environment
//! variables with `from_env()`:
//!
//! - [`auth`]: which authorization policy guards the admin routes
//! - [`cors`]: allowed browser origins
//! - [`firebase`]: service-account credential and provider endpoints
//! - [`server`]: bind address, static client directory, metrics port
//! - [`web_client`]: the public configuration served to the browser SDK
//!
//! # Example
//!
//! ```ignore
//! use welding_admin_config::{AuthConfig, FirebaseConfig, ServerConfig};
//!
//! let server = ServerConfig::from_env();
//! let auth = AuthConfig::from_env()?;
//! let firebase = FirebaseConfig::from_env()?;
//! ```

pub mod auth;
pub mod cors;
pub mod firebase;
pub mod server;
pub mod web_client;

pub use auth::{AuthConfig, AuthPolicy, SUPERVISOR_ROLE};
pub use cors::CorsConfig;
pub use firebase::{FirebaseConfig, ServiceAccountKey};
pub use server::ServerConfig;
pub use web_client::WebClientConfig;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Reads `name`, trimmed; unset and blank values are `None`.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
