//! Hearth - minimal HTTP/1.1 server
//!
//! Core library: connection framing, request parsing, response
//! serialization, dispatch to handlers, and the TLS-capable listener.

pub mod config;
pub mod handler;
pub mod http;
pub mod logging;
pub mod server;
