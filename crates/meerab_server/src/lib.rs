//! HTTP surface for the Meerab Institute website.
//!
//! Routes JSON API calls to the notice and result services and serves the
//! site's static pages. The store handle is opened here before serving and
//! closed after the server drains.

use std::time::{Duration, Instant};

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use log::{debug, error, info, warn};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod pages;
pub mod routes;
pub mod state;

use config::Config;
use meerab_core::{core_version, init_logging, Store};
use routes::{
    bulk_create_results, create_notice, create_result, delete_notice, list_notices,
    search_results,
};
use state::AppState;

/// Bulk uploads carry whole exam sheets.
const BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router(state: AppState, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/api/notices", get(list_notices).post(create_notice))
        .route("/api/notices/:id", delete(delete_notice))
        .route("/api/results", post(create_result))
        .route("/api/results/bulk", post(bulk_create_results))
        .route("/api/results/search", get(search_results));

    api.merge(pages::page_router(&config.pages_dir, &config.public_dir))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    let dotenv = config::load_dotenv();
    let config = Config::load()?;
    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;
    match dotenv {
        Ok(Some(path)) => info!(
            "event=dotenv_load module=config status=ok path={}",
            path.display()
        ),
        Ok(None) => debug!("event=dotenv_load module=config status=skipped reason=not_found"),
        Err(err) => warn!("event=dotenv_load module=config status=error error={err}"),
    }
    config.log_summary();

    info!("Connecting document store...");
    let store = Store::connect(config.store_uri.as_deref());
    let app = build_router(AppState::new(store.clone()), &config);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!(
        "event=server_start module=server status=ok address={address} version={}",
        core_version()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    store.close()?;
    Ok(())
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server method={method} path={path} status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!("Failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!("Failed to install terminate handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
