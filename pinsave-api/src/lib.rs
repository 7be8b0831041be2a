//! # Pin Save API Server
//!
//! REST API exposing the aggregation read path.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /chains` - Supported chain configurations
//! - `GET /posts/:chain_id` - Every published post on a chain, newest first
//!
//! ## Example
//!
//! ```rust,ignore
//! use pinsave_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::new(ApiConfig::from_env());
//! server.run(([0, 0, 0, 0], 3001)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for Pin Save.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Pin Save API server listening on {}", addr);

        axum::serve(listener, self.router()).await
    }
}
