//! Request gating for the admin routes.
//!
//! - [`auth`]: bearer-token extraction and verification with the provider
//! - [`role`]: role lookup for a verified uid
//! - [`gate`]: the [`gate::require_supervisor`] middleware combining both,
//!   or the static allow-list check, depending on `AUTH_POLICY`

pub mod auth;
pub mod gate;
pub mod role;
