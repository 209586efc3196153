//! Coordinator server: WebSocket sessions, HTTP API and background tasks.

mod handler;
pub mod router;
mod server;
mod signal;
pub mod state;
mod sweeper;

pub use server::{Server, ServerConfig};
