//! HTTP server module with optional TLS.
//!
//! Two modes:
//! - **None (default)**: Plain HTTP, for use behind a reverse proxy or platform router
//! - **Manual**: User-provided certificate and key files, reloaded on SIGHUP
//!
//! Both modes shut down gracefully on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
