//! Per-request audit lines for the `/api` namespace.
//!
//! The middleware observes the final response without changing it: JSON
//! bodies are buffered and handed back byte-for-byte, and the line is
//! emitted when the server releases the response body, which happens after
//! the body has been written to the client. Emission can never fail the
//! request.
//!
//! ```text
//! GET /api/users 200 in 12ms :: {"users":[{"uid":"a1","email":"sam@ex…
//! ```

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, header::{CONTENT_LENGTH, CONTENT_TYPE}},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Only paths under this prefix are audited.
pub const AUDIT_PATH_PREFIX: &str = "/api";

/// Longest line emitted, counted in characters, ellipsis included.
pub const MAX_LINE_CHARS: usize = 80;

const ELLIPSIS: char = '…';

/// Identity attached to a response by the authorization gate so the audit
/// line can name who made the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSubject(pub String);

/// One completed request, as recorded by the audit middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub latency_ms: u128,
    pub subject: Option<String>,
    pub line: String,
}

/// Where audit entries go besides the `audit` tracing target.
#[derive(Debug, Clone, Default)]
pub struct AuditSink {
    tee: Option<mpsc::UnboundedSender<AuditEntry>>,
}

impl AuditSink {
    pub fn tracing() -> Self {
        Self::default()
    }

    /// A sink that also forwards each entry to the returned receiver.
    pub fn with_channel() -> (Self, mpsc::UnboundedReceiver<AuditEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tee: Some(tx) }, rx)
    }

    fn emit(&self, entry: AuditEntry) {
        info!(
            target: "audit",
            method = %entry.method,
            path = %entry.path,
            status = entry.status,
            latency_ms = %entry.latency_ms,
            subject = entry.subject.as_deref().unwrap_or("-"),
            "{}",
            entry.line
        );

        if let Some(tee) = &self.tee {
            // A dropped receiver only means nobody is listening any more.
            let _ = tee.send(entry);
        }
    }
}

pub fn is_audited(path: &str) -> bool {
    path == AUDIT_PATH_PREFIX
        || path
            .strip_prefix(AUDIT_PATH_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Builds `<METHOD> <path> <status> in <ms>ms[ :: <body>]`, capped at
/// [`MAX_LINE_CHARS`].
pub fn format_audit_line(
    method: &str,
    path: &str,
    status: u16,
    latency_ms: u128,
    body: Option<&str>,
) -> String {
    let mut line = format!("{} {} {} in {}ms", method, path, status, latency_ms);
    if let Some(body) = body {
        line.push_str(" :: ");
        line.push_str(body);
    }
    truncate_line(line)
}

/// Cuts lines longer than [`MAX_LINE_CHARS`] to one character short of the
/// limit and appends an ellipsis.
pub fn truncate_line(line: String) -> String {
    if line.chars().count() <= MAX_LINE_CHARS {
        return line;
    }
    let mut cut: String = line.chars().take(MAX_LINE_CHARS - 1).collect();
    cut.push(ELLIPSIS);
    cut
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

struct PendingEntry {
    sink: AuditSink,
    method: Method,
    path: String,
    status: StatusCode,
    started: Instant,
    subject: Option<String>,
    body: Option<String>,
}

impl PendingEntry {
    fn finish(self) {
        let latency_ms = self.started.elapsed().as_millis();
        let line = format_audit_line(
            self.method.as_str(),
            &self.path,
            self.status.as_u16(),
            latency_ms,
            self.body.as_deref(),
        );

        self.sink.emit(AuditEntry {
            method: self.method.to_string(),
            path: self.path,
            status: self.status.as_u16(),
            latency_ms,
            subject: self.subject,
            line,
        });
    }
}

/// Emits its entry when dropped, i.e. once the server is done with the
/// response body.
struct AuditGuard(Option<PendingEntry>);

impl Drop for AuditGuard {
    fn drop(&mut self) {
        if let Some(entry) = self.0.take() {
            entry.finish();
        }
    }
}

/// Audit middleware; install with
/// `axum::middleware::from_fn_with_state(AuditSink::tracing(), audit_middleware)`.
pub async fn audit_middleware(
    State(sink): State<AuditSink>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if !is_audited(&path) {
        return next.run(req).await;
    }

    let started = Instant::now();
    let method = req.method().clone();

    let response = next.run(req).await;
    let status = response.status();
    let subject = response
        .extensions()
        .get::<AuditSubject>()
        .map(|s| s.0.clone());

    let (mut parts, body) = response.into_parts();
    let (body, captured) = if is_json(&parts.headers) {
        match body.collect().await {
            Ok(collected) => {
                let bytes = collected.to_bytes();
                let text = std::str::from_utf8(&bytes).ok().map(str::to_owned);
                (Body::from(bytes), text)
            }
            Err(err) => {
                warn!(error = %err, path = %path, "failed to read JSON response body");
                parts.headers.remove(CONTENT_LENGTH);
                (Body::empty(), None)
            }
        }
    } else {
        (body, None)
    };

    let guard = AuditGuard(Some(PendingEntry {
        sink,
        method,
        path,
        status,
        started,
        subject,
        body: captured,
    }));

    let body = body.map_frame(move |frame| {
        let _held = &guard;
        frame
    });

    Response::from_parts(parts, Body::new(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, middleware, response::IntoResponse, routing::get};
    use http_body_util::{Full, Limited};
    use tower::ServiceExt;

    #[test]
    fn test_short_line_is_untouched() {
        let body = format!("{{\"users\":\"{}\"}}", "x".repeat(38));
        assert_eq!(body.len(), 50);

        let line = format_audit_line("GET", "/api/users", 200, 3, Some(&body));
        assert_eq!(line, format!("GET /api/users 200 in 3ms :: {}", body));
        assert!(!line.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_long_line_is_capped_with_ellipsis() {
        let body = format!("{{\"users\":\"{}\"}}", "y".repeat(200));
        let line = format_audit_line("GET", "/api/users", 200, 3, Some(&body));

        assert_eq!(line.chars().count(), MAX_LINE_CHARS);
        assert!(line.ends_with(ELLIPSIS));
        assert!(line.starts_with("GET /api/users 200 in 3ms :: {\"users\""));
    }

    #[test]
    fn test_exactly_max_is_not_truncated() {
        let line = "a".repeat(MAX_LINE_CHARS);
        assert_eq!(truncate_line(line.clone()), line);

        let line = "é".repeat(MAX_LINE_CHARS + 1);
        let cut = truncate_line(line);
        assert_eq!(cut.chars().count(), MAX_LINE_CHARS);
    }

    #[test]
    fn test_line_without_body() {
        assert_eq!(
            format_audit_line("POST", "/api/deleteUser", 403, 12, None),
            "POST /api/deleteUser 403 in 12ms"
        );
    }

    #[test]
    fn test_is_audited() {
        assert!(is_audited("/api"));
        assert!(is_audited("/api/users"));
        assert!(!is_audited("/apis"));
        assert!(!is_audited("/teacher"));
        assert!(!is_audited("/"));
    }

    fn app(sink: AuditSink) -> Router {
        Router::new()
            .route(
                "/api/users",
                get(|| async { Json(serde_json::json!({ "users": [] })) }),
            )
            .route("/teacher", get(|| async { "<html></html>" }))
            .route("/api/broken", get(broken_json))
            .layer(middleware::from_fn_with_state(sink, audit_middleware))
    }

    #[tokio::test]
    async fn test_middleware_emits_after_body_and_preserves_it() {
        let (sink, mut rx) = AuditSink::with_channel();
        let response = app(sink)
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(rx.try_recv().is_err());

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"users":[]}"#);

        let entry = rx.recv().await.unwrap();
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.status, 200);
        assert!(entry.line.starts_with("GET /api/users 200 in "));
        assert!(entry.line.ends_with(r#" :: {"users":[]}"#));
    }

    /// A JSON response whose body errors while being read.
    async fn broken_json() -> Response {
        let payload = r#"{"users":[]}"#;
        let body = Limited::new(Full::new(axum::body::Bytes::from(payload)), 4);
        (
            [
                (CONTENT_TYPE, "application/json".to_string()),
                (CONTENT_LENGTH, payload.len().to_string()),
            ],
            Body::new(body),
        )
            .into_response()
    }

    #[tokio::test]
    async fn test_unreadable_body_drops_content_length() {
        let (sink, mut rx) = AuditSink::with_channel();
        let response = app(sink)
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/broken")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert!(response.headers().get(CONTENT_LENGTH).is_none());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());

        let entry = rx.recv().await.unwrap();
        assert!(entry.line.starts_with("GET /api/broken 200 in "));
        assert!(!entry.line.contains(" :: "));
    }

    #[tokio::test]
    async fn test_middleware_skips_non_api_paths() {
        let (sink, mut rx) = AuditSink::with_channel();
        let response = app(sink)
            .oneshot(
                axum::http::Request::builder()
                    .uri("/teacher")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let _ = response.into_body().collect().await.unwrap();

        assert!(rx.try_recv().is_err());
    }
}
