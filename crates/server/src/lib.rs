//! kwcluster server: HTTP JSON API for keyword clustering.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! Public:
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (503 while credentials are missing)
//! - `GET /metrics` - Prometheus metrics
//!
//! Protected (`X-API-Key` or `Authorization: Bearer <key>`):
//!
//! - `POST /api/v1/keywords/cluster` - cluster, label and optionally persist keywords
//! - `GET /api/v1/projects/{project_id}/clusters` - persisted clusters of a project
//!
//! Errors are `{ "error": "<message>" }` with a non-2xx status.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
