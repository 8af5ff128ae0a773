//! Listening socket, TLS termination and the per-connection task.

pub mod listener;
pub mod tls;

pub use listener::Server;
