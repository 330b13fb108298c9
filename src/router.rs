use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;
use welding_admin_config::CorsConfig;
use welding_admin_core::AppError;
use welding_admin_observability::{AuditSink, audit_middleware, metrics_middleware};

use crate::docs::ApiDoc;
use crate::middleware::auth::ADMIN_EMAIL_HEADER;
use crate::middleware::gate::require_supervisor;
use crate::modules::client_config::router::init_client_config_router;
use crate::modules::pages::router::init_pages_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    init_router_with_audit(state, AuditSink::tracing())
}

/// Builds the application with audit entries also delivered to `audit`.
pub fn init_router_with_audit(state: AppState, audit: AuditSink) -> Router {
    let cors = cors_layer(&state.cors_config);
    let pages = init_pages_router(&state.server_config.client_dir);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .merge(init_users_router().route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_supervisor,
                )))
                .merge(init_client_config_router())
                .fallback(api_not_found),
        )
        .merge(pages)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn_with_state(audit, audit_middleware))
}

async fn api_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Not found"))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(ADMIN_EMAIL_HEADER),
        ]);

    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(allowed_origins)
}
