#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use welding_admin::router::{init_router, init_router_with_audit};
use welding_admin::state::AppState;
use welding_admin_config::AuthConfig;
use welding_admin_firebase::Provider;
use welding_admin_firebase::memory::InMemoryFirebase;
use welding_admin_observability::{AuditEntry, AuditSink};

pub const TEST_DEADLINE: Duration = Duration::from_secs(2);

/// An application wired to an in-memory provider.
pub struct TestApp {
    pub firebase: Arc<InMemoryFirebase>,
    pub state: AppState,
}

pub struct TestAccount {
    pub uid: String,
    pub token: String,
}

impl TestApp {
    pub fn new(auth_config: AuthConfig) -> Self {
        Self::with_deadline(auth_config, TEST_DEADLINE)
    }

    pub fn token_role() -> Self {
        Self::new(AuthConfig::token_role())
    }

    pub fn with_deadline(auth_config: AuthConfig, deadline: Duration) -> Self {
        let firebase = Arc::new(InMemoryFirebase::new());
        let provider = Provider::new(firebase.clone(), firebase.clone(), deadline);
        Self {
            firebase,
            state: AppState::new(provider, auth_config),
        }
    }

    pub fn router(&self) -> axum::Router {
        init_router(self.state.clone())
    }

    pub fn router_with_audit(
        &self,
    ) -> (axum::Router, tokio::sync::mpsc::UnboundedReceiver<AuditEntry>) {
        let (sink, rx) = AuditSink::with_channel();
        (init_router_with_audit(self.state.clone(), sink), rx)
    }

    /// An account holding the supervisor role, with a live token.
    pub fn supervisor(&self) -> TestAccount {
        let uid = self.firebase.insert_user(&unique_email(), "supervisor-pass");
        self.firebase.set_role(&uid, "supervisor");
        let token = self.firebase.issue_token(&uid);
        TestAccount { uid, token }
    }

    /// An account with the given role (or none), with a live token.
    pub fn account_with_role(&self, role: Option<&str>) -> TestAccount {
        let uid = self.firebase.insert_user(&unique_email(), "account-pass");
        if let Some(role) = role {
            self.firebase.set_role(&uid, role);
        }
        let token = self.firebase.issue_token(&uid);
        TestAccount { uid, token }
    }

    pub async fn send(&self, request: Request<Body>) -> (u16, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        read_json(response).await
    }
}

pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}-{}", unique_prefix(), email)
}

fn unique_prefix() -> String {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    format!("t{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn read_json(response: Response<Body>) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
