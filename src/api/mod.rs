//! HTTP API
//!
//! Provides:
//! - Record listing and submission
//! - Vote casting with server-side confidence recomputation
//! - Current-user lookup and health check

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::auth::JwtValidator;
use crate::storage::Store;

/// State shared across handlers
pub struct AppState {
    pub store: Mutex<Store>,
    pub jwt: JwtValidator,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: Store, jwt: JwtValidator) -> SharedState {
        Arc::new(Self {
            store: Mutex::new(store),
            jwt,
        })
    }
}

/// Build the API router
pub fn create_router(state: SharedState, cors_max_age: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(cors_max_age);

    Router::new()
        .route("/records", get(routes::list_records).post(routes::create_record))
        .route("/votes", post(routes::cast_vote))
        .route("/user", get(routes::current_user))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Serve `app` on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    if let Some(addr) = addr {
        info!("API listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
