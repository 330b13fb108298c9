//! # Welding Admin Firebase
//!
//! Access to the two external stores the admin API is a client of:
//!
//! - the identity provider (Firebase Authentication), behind [`IdentityProvider`]
//! - the realtime database holding role records, behind [`RoleStore`]
//!
//! [`FirebaseClient`] implements both against the Identity Toolkit and
//! Realtime Database REST APIs, authenticating with the service-account key
//! through [`credentials::TokenSource`]. Handlers never see the client
//! directly; they receive a [`Provider`] handle built once at startup, which
//! also applies the per-call deadline.
//!
//! With the `test-utils` feature, [`memory::InMemoryFirebase`] provides a
//! fake implementing both traits with call counting.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use welding_admin_config::FirebaseConfig;
//! use welding_admin_firebase::{FirebaseClient, Provider};
//!
//! let config = FirebaseConfig::from_env()?;
//! let client = Arc::new(FirebaseClient::new(&config)?);
//! let provider = Provider::new(client.clone(), client, config.timeout);
//!
//! let users = provider.call(provider.identity().list_users(1000)).await?;
//! ```

pub mod client;
pub mod credentials;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod memory;
pub mod model;
pub mod provider;

pub use client::FirebaseClient;
pub use error::ProviderError;
pub use model::{RoleRecord, UserRecord, UserUpdate};
pub use provider::{IdentityProvider, Provider, RoleStore};
