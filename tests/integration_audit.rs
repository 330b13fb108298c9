mod common;

use common::{TestApp, get, post_json, read_json};
use serde_json::json;
use tower::ServiceExt;
use welding_admin_observability::audit::MAX_LINE_CHARS;

#[tokio::test]
async fn test_admitted_request_is_audited_with_subject() {
    let app = TestApp::token_role();
    let supervisor = app.supervisor();
    let (router, mut audit) = app.router_with_audit();

    let response = router
        .oneshot(get("/api/users", Some(&supervisor.token)))
        .await
        .unwrap();
    let (status, _) = read_json(response).await;
    assert_eq!(status, 200);

    let entry = audit.recv().await.unwrap();
    assert_eq!(entry.method, "GET");
    assert_eq!(entry.path, "/api/users");
    assert_eq!(entry.status, 200);
    assert_eq!(entry.subject.as_deref(), Some(supervisor.uid.as_str()));
    assert!(entry.line.starts_with("GET /api/users 200 in "));
    assert!(entry.line.contains(" :: {\"users\":"));
    assert!(entry.line.chars().count() <= MAX_LINE_CHARS);
}

#[tokio::test]
async fn test_rejected_request_is_audited_without_subject() {
    let app = TestApp::token_role();
    let (router, mut audit) = app.router_with_audit();

    let response = router
        .oneshot(post_json("/api/deleteUser", None, json!({ "uid": "u1" })))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, 401);
    assert_eq!(body, json!({ "error": "Missing auth token" }));

    let entry = audit.recv().await.unwrap();
    assert_eq!(entry.status, 401);
    assert_eq!(entry.subject, None);
    assert!(
        entry
            .line
            .starts_with("POST /api/deleteUser 401 in ")
    );
    assert!(entry.line.ends_with(r#" :: {"error":"Missing auth token"}"#));
}

#[tokio::test]
async fn test_long_bodies_are_truncated() {
    let app = TestApp::token_role();
    let supervisor = app.supervisor();
    for i in 0..20 {
        app.firebase
            .insert_user(&format!("welder{}@welding.example", i), "secret1");
    }
    let (router, mut audit) = app.router_with_audit();

    let response = router
        .oneshot(get("/api/users", Some(&supervisor.token)))
        .await
        .unwrap();
    let _ = read_json(response).await;

    let entry = audit.recv().await.unwrap();
    assert_eq!(entry.line.chars().count(), MAX_LINE_CHARS);
    assert!(entry.line.ends_with('…'));
}

#[tokio::test]
async fn test_pages_are_not_audited() {
    let app = TestApp::token_role();
    let (router, mut audit) = app.router_with_audit();

    let response = router.oneshot(get("/swagger-ui/", None)).await.unwrap();
    let _ = http_body_util::BodyExt::collect(response.into_body()).await;

    assert!(audit.try_recv().is_err());
}
