//! # Castle Planning Service
//!
//! Serves the scheduler over TCP so a game client or bot can ask for a
//! plan without linking the solver.
//!
//! ## Crate Structure
//!
//! - [`protocol`] - JSON-lines requests and responses
//! - [`service`] - Request handling against a loaded catalog
//! - [`optimizer`] - Army recommendation seam
//! - [`server`] - tokio TCP listener and per-connection tasks

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod optimizer;
pub mod protocol;
pub mod server;
pub mod service;

pub use optimizer::{ArmyOptimizer, NoRecommendation, UnitsRecommendation};
pub use protocol::{Request, Response, SolveRequest, SolveResponse};
pub use server::{bind, serve, ServerError};
pub use service::SolverService;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
        }
    }
}
