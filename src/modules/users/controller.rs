use axum::{Json, extract::State};
use tracing::instrument;
use welding_admin_core::{AppError, ErrorResponse};

use crate::middleware::gate::Supervisor;
use crate::modules::users::model::{
    CreateUserDto, CreateUserResponse, DeleteUserDto, SuccessResponse, UpdateEmailDto,
    UpdatePasswordDto, UsersResponse,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List accounts (one provider page, at most 1000)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Accounts, without credential material", body = UsersResponse),
        (status = 400, description = "Provider error", body = ErrorResponse),
        (status = 401, description = "Missing auth token", body = ErrorResponse),
        (status = 403, description = "Not authorized or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("admin_email" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    supervisor: Supervisor,
) -> Result<Json<UsersResponse>, AppError> {
    let users = UserService::list_users(&state.provider).await?;
    Ok(Json(UsersResponse { users }))
}

/// Create an account with email and password
#[utoipa::path(
    post,
    path = "/api/createUser",
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "Account created", body = CreateUserResponse),
        (status = 400, description = "Missing fields or provider error", body = ErrorResponse),
        (status = 401, description = "Missing auth token", body = ErrorResponse),
        (status = 403, description = "Not authorized or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("admin_email" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    supervisor: Supervisor,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Json<CreateUserResponse>, AppError> {
    let uid = UserService::create_user(&state.provider, dto).await?;
    Ok(Json(CreateUserResponse { success: true, uid }))
}

/// Change an account's email address
#[utoipa::path(
    post,
    path = "/api/updateEmail",
    request_body = UpdateEmailDto,
    responses(
        (status = 200, description = "Email updated", body = SuccessResponse),
        (status = 400, description = "Missing fields or provider error", body = ErrorResponse),
        (status = 401, description = "Missing auth token", body = ErrorResponse),
        (status = 403, description = "Not authorized or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("admin_email" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_email(
    State(state): State<AppState>,
    supervisor: Supervisor,
    ValidatedJson(dto): ValidatedJson<UpdateEmailDto>,
) -> Result<Json<SuccessResponse>, AppError> {
    UserService::update_email(&state.provider, dto).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Set a new password for an account
#[utoipa::path(
    post,
    path = "/api/updatePassword",
    request_body = UpdatePasswordDto,
    responses(
        (status = 200, description = "Password updated", body = SuccessResponse),
        (status = 400, description = "Missing fields or provider error", body = ErrorResponse),
        (status = 401, description = "Missing auth token", body = ErrorResponse),
        (status = 403, description = "Not authorized or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("admin_email" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_password(
    State(state): State<AppState>,
    supervisor: Supervisor,
    ValidatedJson(dto): ValidatedJson<UpdatePasswordDto>,
) -> Result<Json<SuccessResponse>, AppError> {
    UserService::update_password(&state.provider, dto).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Delete an account and its role record
///
/// The account is named by `uid`, or by `email` when no uid is given.
#[utoipa::path(
    post,
    path = "/api/deleteUser",
    request_body = DeleteUserDto,
    responses(
        (status = 200, description = "Account deleted", body = SuccessResponse),
        (status = 400, description = "Missing uid or provider error", body = ErrorResponse),
        (status = 401, description = "Missing auth token", body = ErrorResponse),
        (status = 403, description = "Not authorized or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("admin_email" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    supervisor: Supervisor,
    ValidatedJson(dto): ValidatedJson<DeleteUserDto>,
) -> Result<Json<SuccessResponse>, AppError> {
    UserService::delete_user(&state.provider, dto).await?;
    Ok(Json(SuccessResponse::ok()))
}
