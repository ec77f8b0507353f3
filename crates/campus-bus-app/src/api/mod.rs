//! HTTP API for the fleet service
//!
//! | method | path                     |
//! |--------|--------------------------|
//! | GET    | `/api/health`            |
//! | POST   | `/api/update`            |
//! | GET    | `/api/locations`         |
//! | GET    | `/api/locations/:bus_id` |
//! | GET    | `/api/routes`            |
//! | GET    | `/api/stats`             |
//! | POST   | `/api/assistant`         |

pub mod error;
pub mod routes;
pub mod state;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use campus_bus_types::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use error::ApiError;
pub use state::AppState;

/// Build the router with all fleet endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/health", get(routes::health_handler))
        .route("/api/update", post(routes::update_handler))
        .route("/api/locations", get(routes::locations_handler))
        .route("/api/locations/:bus_id", get(routes::location_handler))
        .route("/api/routes", get(routes::routes_handler))
        .route("/api/stats", get(routes::stats_handler))
        .route("/api/assistant", post(routes::assistant_handler))
        .layer(cors)
        .with_state(state)
}

/// Bind `address` and serve until Ctrl+C or SIGTERM
pub async fn serve(address: &str, state: Arc<AppState>) -> Result<()> {
    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    serve_with_listener(listener, state, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr()?;
    let app = build_router(state);

    info!("Fleet service running on {address}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Fleet service shut down");
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
