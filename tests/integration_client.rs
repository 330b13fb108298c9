mod common;

use std::fs;

use common::{TestApp, get, post_json, read_json};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use welding_admin_config::WebClientConfig;

#[tokio::test]
async fn test_firebase_config_served_on_get_and_post() {
    let mut app = TestApp::token_role();
    app.state.web_client_config = WebClientConfig {
        api_key: Some("public-key".to_string()),
        project_id: Some("welding-form".to_string()),
        ..WebClientConfig::default()
    };

    let (status, body) = app.send(get("/api/firebaseConfig", None)).await;
    assert_eq!(status, 200);
    assert_eq!(body["apiKey"], "public-key");
    assert_eq!(body["projectId"], "welding-form");

    let (status, post_body) = app
        .send(post_json("/api/firebaseConfig", None, json!({})))
        .await;
    assert_eq!(status, 200);
    assert_eq!(post_body, body);
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let app = TestApp::token_role();

    let (status, body) = app.send(get("/api/nope", None)).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_named_pages_and_assets() {
    let client_dir = tempfile::tempdir().unwrap();
    fs::write(client_dir.path().join("teacher.html"), "<h1>teacher</h1>").unwrap();
    fs::write(client_dir.path().join("tanks.html"), "<h1>tanks</h1>").unwrap();
    fs::write(client_dir.path().join("test.html"), "<h1>test</h1>").unwrap();
    fs::write(client_dir.path().join("index.html"), "<h1>student</h1>").unwrap();
    fs::write(client_dir.path().join("app.js"), "console.log(1)").unwrap();

    let mut app = TestApp::token_role();
    app.state.server_config.client_dir = client_dir.path().to_path_buf();

    for (path, expected) in [
        ("/teacher", "<h1>teacher</h1>"),
        ("/tanks", "<h1>tanks</h1>"),
        ("/test", "<h1>test</h1>"),
        ("/student", "<h1>student</h1>"),
        ("/app.js", "console.log(1)"),
    ] {
        let response = app.router().oneshot(get(path, None)).await.unwrap();
        assert_eq!(response.status().as_u16(), 200, "{}", path);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], expected.as_bytes());
    }

    let response = app.router().oneshot(get("/missing.html", None)).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_openapi_document_lists_admin_routes() {
    let app = TestApp::token_role();

    let response = app
        .router()
        .oneshot(get("/api-docs/openapi.json", None))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;

    assert_eq!(status, 200);
    for path in [
        "/api/users",
        "/api/createUser",
        "/api/updateEmail",
        "/api/updatePassword",
        "/api/deleteUser",
        "/api/firebaseConfig",
    ] {
        assert!(body["paths"].get(path).is_some(), "{}", path);
    }
    let client_config = &body["paths"]["/api/firebaseConfig"];
    assert!(client_config["get"].is_object());
    assert!(client_config["post"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}
