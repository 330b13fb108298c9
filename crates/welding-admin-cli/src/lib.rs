//! # Welding Admin CLI
//!
//! A typed client for the admin API ([`client`]) and bulk account seeding
//! for development environments ([`seeder`]).
//!
//! ## Usage
//!
//! ```ignore
//! use welding_admin_cli::client::{AdminClient, Credential};
//!
//! let client = AdminClient::new("http://localhost:5000", Credential::Bearer(token))?;
//! for user in client.list_users().await? {
//!     println!("{} {}", user.uid, user.email.unwrap_or_default());
//! }
//! ```

pub mod client;
pub mod seeder;
