//! # Welding Admin API
//!
//! Account administration for the welding training console. Supervisors
//! list, create, update and delete user accounts held by Firebase
//! Authentication; every account route sits behind an authorization gate.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Bearer verification, role lookup, the gate
//! ├── modules/
//! │   ├── users/        # Account administration routes
//! │   ├── client_config/# Public browser SDK configuration
//! │   └── pages/        # Console pages and static assets
//! ├── docs.rs           # OpenAPI document
//! ├── router.rs         # Application router and layers
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Feature modules follow the same layout: `controller.rs` (handlers),
//! `service.rs` (provider calls), `model.rs` (DTOs), `router.rs`.
//!
//! ## Authorization
//!
//! `AUTH_POLICY` selects one of two policies:
//!
//! | Policy | Credential | Admitted when |
//! |--------|------------|---------------|
//! | `token_role` (default) | `Authorization: Bearer <ID token>` | the token verifies and the subject's role record says `supervisor` |
//! | `static_allow_list` | `x-admin-email: <address>` | the address equals `SUPER_ADMIN_EMAIL` byte for byte |
//!
//! A missing credential is answered with 401, anything else with 403, and in
//! either case no account operation reaches the provider.
//!
//! ## Configuration
//!
//! ```bash
//! FIREBASE_ADMIN_KEY='{"type":"service_account",...}'
//! FIREBASE_DATABASE_URL=https://welding-form-default-rtdb.firebaseio.com
//! AUTH_POLICY=token_role
//! PORT=5000
//! ```
//!
//! API documentation is served at `/swagger-ui` and `/scalar`.

pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use welding_admin_config;
pub use welding_admin_core;
pub use welding_admin_firebase;
pub use welding_admin_observability;
