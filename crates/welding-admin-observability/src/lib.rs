//! Welding Admin Observability
//!
//! - Audit lines for every `/api` request ([`audit`])
//! - Tracing to console, rolling files and, optionally, OpenTelemetry
//! - Prometheus metrics for HTTP traffic
//!
//! Tracing export and metrics sit behind the `observability` feature
//! (default). At runtime they can be switched off with
//! `OBSERVABILITY_ENABLED=false`, which leaves console logging and audit
//! lines in place.
//!
//! # Examples
//!
//! ```no_run
//! use welding_admin_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

pub mod audit;
pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use audit::{AuditEntry, AuditSink, AuditSubject, audit_middleware};
pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{init_metrics, metrics_middleware, track_user_admin_operation};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    pub fn is_observability_enabled() -> bool {
        false
    }

    /// Console logging only when the feature is disabled
    pub fn init_tracing() {
        crate::basic_logging::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<Router> {
        None
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn track_user_admin_operation(_operation: &'static str, _success: bool) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
