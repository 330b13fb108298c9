use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use welding_admin_config::WebClientConfig;
use welding_admin_core::ErrorResponse;
use welding_admin_firebase::UserRecord;

use crate::middleware::auth::ADMIN_EMAIL_HEADER;
use crate::modules::users::model::{
    CreateUserDto, CreateUserResponse, DeleteUserDto, SuccessResponse, UpdateEmailDto,
    UpdatePasswordDto, UsersResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_email,
        crate::modules::users::controller::update_password,
        crate::modules::users::controller::delete_user,
        crate::modules::client_config::controller::get_firebase_config,
    ),
    components(
        schemas(
            UserRecord,
            UsersResponse,
            CreateUserDto,
            CreateUserResponse,
            UpdateEmailDto,
            UpdatePasswordDto,
            DeleteUserDto,
            SuccessResponse,
            WebClientConfig,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Account administration for supervisors"),
        (name = "Client", description = "Public configuration for the browser console")
    ),
    info(
        title = "Welding Admin API",
        version = "0.1.0",
        description = "Supervisor-only account administration over Firebase Authentication and the Realtime Database."
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Firebase ID token")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "admin_email",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_EMAIL_HEADER))),
            );
        }
    }
}
