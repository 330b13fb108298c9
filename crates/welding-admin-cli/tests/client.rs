use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use welding_admin::router::init_router;
use welding_admin::state::AppState;
use welding_admin_cli::client::{AdminClient, Credential, DeleteBy};
use welding_admin_cli::seeder::{SeedConfig, seed_accounts};
use welding_admin_config::AuthConfig;
use welding_admin_firebase::Provider;
use welding_admin_firebase::memory::InMemoryFirebase;

const ADMIN: &str = "boss@welding.example";

async fn spawn_server(auth_config: AuthConfig) -> (String, Arc<InMemoryFirebase>) {
    let firebase = Arc::new(InMemoryFirebase::new());
    let provider = Provider::new(firebase.clone(), firebase.clone(), Duration::from_secs(2));
    let app = init_router(AppState::new(provider, auth_config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", address), firebase)
}

#[tokio::test]
async fn test_full_account_lifecycle() {
    let (url, firebase) = spawn_server(AuthConfig::static_allow_list(ADMIN)).await;
    let client = AdminClient::new(&url, Credential::AdminEmail(ADMIN.to_string())).unwrap();

    let uid = client
        .create_user("welder@welding.example", "secret1")
        .await
        .unwrap();
    assert!(firebase.user(&uid).is_some());

    client
        .update_email(&uid, "senior.welder@welding.example")
        .await
        .unwrap();
    client.update_password(&uid, "secret2").await.unwrap();
    assert_eq!(firebase.password_of(&uid).as_deref(), Some("secret2"));

    let users = client.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(
        users[0].email.as_deref(),
        Some("senior.welder@welding.example")
    );

    client
        .delete_user(&DeleteBy::Email("senior.welder@welding.example".to_string()))
        .await
        .unwrap();
    assert_eq!(firebase.user_count(), 0);
}

#[tokio::test]
async fn test_api_errors_carry_status_and_message() {
    let (url, _firebase) = spawn_server(AuthConfig::static_allow_list(ADMIN)).await;

    let outsider =
        AdminClient::new(&url, Credential::AdminEmail("someone@else.example".to_string()))
            .unwrap();
    let err = outsider.list_users().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
    assert_eq!(err.to_string(), "403 Forbidden: Not authorized");

    let admin = AdminClient::new(&url, Credential::AdminEmail(ADMIN.to_string())).unwrap();
    let err = admin
        .delete_user(&DeleteBy::Uid("missing".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
}

#[tokio::test]
async fn test_seed_with_supervisor_token() {
    let (url, firebase) = spawn_server(AuthConfig::token_role()).await;
    let uid = firebase.insert_user(ADMIN, "supervisor-pass");
    firebase.set_role(&uid, "supervisor");
    let token = firebase.issue_token(&uid);

    let client = AdminClient::new(&url, Credential::Bearer(token)).unwrap();
    let report = seed_accounts(&client, &SeedConfig::new(5, "welding123")).await;

    assert_eq!(report.created.len(), 5);
    assert!(report.failed.is_empty());
    assert_eq!(firebase.user_count(), 6);
}
