//! Documentation of the school activities site.
//!
//!
//!
//! # General Infrastructure
//! - One container running this server, the SQLite file is baked into the image
//! - The database is opened read-only, the filesystem of the container is read-only too
//! - Content changes go through the `updater` tool, then a new image is built
//! - Low traffic, a few hundred rows per tab at most
//!
//!
//!
//! # Routes
//!
//! - `GET /?tab=<id>` renders the page, unknown or missing ids land on `home`
//! - `GET /api/<id>` rows of the tab as a JSON array, 404 for unknown ids
//! - `GET /health` liveness, always `ok`
//! - `GET /static/*` files from `STATIC_DIR`
//!
//!
//!
//! # Caching
//!
//! Tab rows are cached in memory for a minute, see [cache]. Settings are read on
//! every page render since they are a single row.
//!
//!
//!
//! # Setup
//!
//! Build the database.
//! ```sh
//! sqlite3 app/app.db < db/schema.sql
//! sqlite3 app/app.db < db/seed.sql
//! ```
//!
//! Or let the updater do it.
//! ```sh
//! cargo run -p updater -- -f courses.csv -t docs
//! ```
//!
//! Run.
//! ```sh
//! DB_PATH=app/app.db STATIC_DIR=backend/server/static RUST_LOG=info cargo run -p school
//! ```
//!
//!
//!
//! # Environment
//!
//! | variable     | default       |
//! |--------------|---------------|
//! | `BIND_ADDR`  | `0.0.0.0`     |
//! | `PORT`       | `5000`        |
//! | `DB_PATH`    | `/app/app.db` |
//! | `STATIC_DIR` | `static`      |
//! | `RUST_LOG`   | unset         |
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use error::AppError;
use routes::{api_handler, health_handler, index_handler};
use state::State;

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;
    let address = config.address();

    info!("Initializing state...");
    let state = State::new(config)?;

    info!("Starting server...");
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(index_handler))
        .route("/api/{tab}", get(api_handler))
        .route("/health", get(health_handler))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
