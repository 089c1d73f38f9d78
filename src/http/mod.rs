//! HTTP server module.
//!
//! Binds the configured address (all interfaces by default), serves the
//! router, and shuts down gracefully on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{bind_addr, serve, start_server, ServerError};
