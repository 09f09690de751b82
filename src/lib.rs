//! UsedFinder backend: a small proxy in front of the Etsy Open API.
//!
//! Exposes `/etsy` for listing search and `/healthz` for liveness. See
//! [`etsy`] for the search pipeline and [`routes`] for the HTTP surface.

pub mod config;
pub mod error;
pub mod etsy;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::AppState;
