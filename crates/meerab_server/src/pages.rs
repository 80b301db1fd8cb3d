use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// Site pages served from the pages directory, keyed by route.
pub const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/about", "about.html"),
    ("/services", "services.html"),
    ("/gallery", "gallery.html"),
    ("/result", "result.html"),
    ("/admin", "admin.html"),
];

/// Page routes plus a static-asset fallback for every unmatched path.
pub fn page_router(pages_dir: &Path, public_dir: &Path) -> Router<AppState> {
    PAGES
        .iter()
        .fold(Router::new(), |router, &(route, file)| {
            router.route_service(route, ServeFile::new(pages_dir.join(file)))
        })
        .fallback_service(ServeDir::new(public_dir))
}
