//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs (inbound requests and outbound messages)
//! - `http`: HTTP API response DTOs
//! - `conversion`: domain events → outbound WebSocket frames

pub mod conversion;
pub mod http;
pub mod websocket;
