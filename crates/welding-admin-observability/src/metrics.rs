use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use tracing::warn;

use crate::logging::is_observability_enabled;

/// Installs the Prometheus recorder and returns the router serving
/// `/metrics`. Returns `None` if observability is disabled or a recorder is
/// already installed.
pub fn init_metrics() -> Option<Router> {
    if !is_observability_enabled() {
        return None;
    }

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )
        .ok()?;

    let handle = match builder.install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed");
            return None;
        }
    };

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(Router::new().route("/metrics", get(move || async move { handle.render() })))
}

/// API routes that get their own `path` label.
pub const KNOWN_API_ROUTES: [&str; 6] = [
    "/api/users",
    "/api/createUser",
    "/api/updateEmail",
    "/api/updatePassword",
    "/api/deleteUser",
    "/api/firebaseConfig",
];

/// Label for the `path` dimension.
///
/// Only the known API routes are labelled by path. Any other `/api` path
/// collapses into `unmatched` and everything else into `static`, so the
/// label set stays bounded whatever clients request.
fn route_label(req: &Request) -> &'static str {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or_else(|| req.uri().path());
    if let Some(&known) = KNOWN_API_ROUTES.iter().find(|route| **route == path) {
        known
    } else if crate::audit::is_audited(path) {
        "unmatched"
    } else {
        "static"
    }
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = route_label(&req);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path, "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Counts a completed user-administration operation (`list`, `create`, ...).
pub fn track_user_admin_operation(operation: &'static str, success: bool) {
    if !is_observability_enabled() {
        return;
    }
    let outcome = if success { "success" } else { "error" };
    counter!("user_admin_operations_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_route_label() {
        assert_eq!(route_label(&request("/api/users")), "/api/users");
        assert_eq!(route_label(&request("/teacher")), "static");
        assert_eq!(route_label(&request("/assets/app.js")), "static");
        assert_eq!(route_label(&request("/api")), "unmatched");
    }

    #[test]
    fn test_route_label_every_known_route() {
        for route in KNOWN_API_ROUTES {
            assert_eq!(route_label(&request(route)), route);
        }
    }

    #[test]
    fn test_unknown_api_paths_share_one_label() {
        let labels: std::collections::HashSet<_> = (0..5)
            .map(|i| route_label(&request(&format!("/api/junk-{i}"))))
            .collect();
        assert_eq!(labels.len(), 1);
        assert!(labels.contains("unmatched"));
    }
}
