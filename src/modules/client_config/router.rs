use axum::{Router, routing::get};

use crate::modules::client_config::controller::get_firebase_config;
use crate::state::AppState;

pub fn init_client_config_router() -> Router<AppState> {
    Router::new().route(
        "/firebaseConfig",
        get(get_firebase_config).post(get_firebase_config),
    )
}
