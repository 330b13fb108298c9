//! # Welding Admin Core
//!
//! Foundational types shared by every crate in the admin backend:
//!
//! - [`errors`]: [`AppError`] and its `{ "error": message }` response shape
//! - [`serde`]: lenient deserializers for operator-console request bodies
//!
//! # Example
//!
//! ```ignore
//! use welding_admin_core::errors::AppError;
//!
//! let error = AppError::bad_request(anyhow::anyhow!("UID required."));
//! ```

pub mod errors;
pub mod serde;

pub use errors::{AppError, ErrorResponse};
