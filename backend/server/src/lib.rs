//! Documentation of a ranked tips voting server.
//!
//!
//!
//! # General Infrastructure
//! - One axum server, one Redis instance
//! - Every request is handled on its own task, the only shared state is the config and the store client
//! - The store client is injected at startup, Redis in production and an in-memory store for local runs
//!
//!
//!
//! # Routes
//!
//! | Route | Result |
//! |---|---|
//! | `GET /` | HTML table of tips ranked by votes |
//! | `GET /json` | JSON array of `{"ID", "Tip", "Votes"}` in ranked order |
//! | `POST /vote` | body `{"ID": int, "Vote": bool}`, echoes the vote back |
//! | `GET /healthcheck` | `OK`, never touches Redis |
//!
//!
//!
//! # Notes
//!
//! ## Tip ids
//! Tip ids are positions in the catalog reply, nothing stores them. The catalog is a Redis list
//! under `l_protips` by default so positions stay put. Older data kept tips in a set under
//! `protip`, `PROTIP_CATALOG=set` reads that layout as is, with the caveat that set order is up
//! to Redis. `PROTIP_TIPS_KEY` overrides the key for either layout.
//!
//! ## Votes
//! Every vote is a single `HINCRBY` on the votes hash. Concurrent voters never lose an update.
//! Votes are not checked against the catalog, an unknown id simply gets its own counter.
//!
//! ## Listing
//! The listing reads the catalog, then all counters with one `HMGET`. A vote landing between the
//! two reads is visible in the result. This is acceptable, eventual consistency is fine here.
//!
//!
//!
//! # Setup
//!
//! Seed a few tips into the default list layout.
//! ```sh
//! redis-cli RPUSH l_protips "Use a knife" "Wear a hat"
//! ```
//!
//! Run against Redis.
//! ```sh
//! RUST_LOG=info cargo run -p protip
//! ```
//!
//! Run against set-layout data (`SADD protip ...`).
//! ```sh
//! PROTIP_CATALOG=set cargo run -p protip
//! ```
//!
//! Run without Redis.
//! ```sh
//! PROTIP_STORE=memory PROTIP_TIPS_FILE=tips.txt cargo run -p protip
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod models;
pub mod render;
pub mod routes;
pub mod service;
pub mod state;
pub mod utils;

use error::{AppError, Result};
use routes::{healthcheck_handler, json_tips_handler, tips_handler, vote_handler};
use state::State;

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(tips_handler))
        .route("/json", get(json_tips_handler))
        .route("/vote", post(vote_handler))
        .route("/healthcheck", get(healthcheck_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new()?;

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::Config(format!("cannot bind {address}: {e}")))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
