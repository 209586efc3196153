//! Tandem session coordinator.
//!
//! Pairs peers into small rooms over WebSocket and relays gameplay traffic:
//! guest input goes to the room's host, the host's state snapshots go to everyone else.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
