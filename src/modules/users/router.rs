use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::users::controller::{
    create_user, delete_user, list_users, update_email, update_password,
};
use crate::state::AppState;

/// Account routes, mounted under `/api` behind the authorization gate.
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/createUser", post(create_user))
        .route("/updateEmail", post(update_email))
        .route("/updatePassword", post(update_password))
        .route("/deleteUser", post(delete_user))
}
