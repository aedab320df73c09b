//! IPC over a Unix socket.
//!
//! Key bindings, bar click handlers and scripts reach the running daemon by
//! sending newline-delimited JSON commands to its socket, either directly or
//! through `padstat-ctl`.

pub mod client;
pub mod listener;
