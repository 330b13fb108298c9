use axum::{Json, extract::State};
use welding_admin_config::WebClientConfig;

use crate::state::AppState;

/// Public web-client configuration for the browser SDK
///
/// Served without authorization on both GET and POST; it holds no secrets.
#[utoipa::path(
    method(get, post),
    path = "/api/firebaseConfig",
    responses(
        (status = 200, description = "Browser SDK configuration", body = WebClientConfig)
    ),
    tag = "Client"
)]
pub async fn get_firebase_config(State(state): State<AppState>) -> Json<WebClientConfig> {
    Json(state.web_client_config.clone())
}
