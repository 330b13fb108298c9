//! Operator console pages and their static assets.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// Friendly page paths and the file under the client directory each one
/// serves.
pub const PAGES: [(&str, &str); 4] = [
    ("/teacher", "teacher.html"),
    ("/tanks", "tanks.html"),
    ("/test", "test.html"),
    ("/student", "index.html"),
];

/// Named pages plus a static fallback over `client_dir` for everything the
/// other routers do not claim.
pub fn init_pages_router(client_dir: &Path) -> Router<AppState> {
    let router = PAGES
        .iter()
        .fold(Router::new(), |router, (route, file)| {
            router.route_service(route, ServeFile::new(client_dir.join(file)))
        });

    router.fallback_service(ServeDir::new(client_dir))
}
