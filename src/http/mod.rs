//! HTTP protocol implementation.
//!
//! This module implements a minimal HTTP/1.1 server that answers exactly one
//! request per connection.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The per-connection worker implementing the request-response state machine
//! - **`framer`**: Decides when a client has sent a whole message, using an inactivity timeout
//! - **`parser`**: Parses a framed message into a request
//! - **`request`**: HTTP request representation and methods
//! - **`headers`**: Ordered header fields shared by requests and responses
//! - **`response`**: HTTP response representation
//! - **`status`**: The status code registry
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Frame bytes until a short read or client idle
//!        └──────┬──────┘
//!               │ Message framed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, dispatch (400 on parse failure)
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hearth::handler::{Dispatcher, StaticFileHandler};
//! use hearth::http::connection::Connection;
//! use hearth::http::framer::FramingConfig;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let dispatcher = Arc::new(Dispatcher::new(StaticFileHandler::new("root")));
//!
//!     loop {
//!         let (socket, peer) = listener.accept().await?;
//!         let dispatcher = Arc::clone(&dispatcher);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, dispatcher, FramingConfig::default());
//!             if let Err(e) = conn.run().await {
//!                 tracing::error!("Connection error from {}: {}", peer, e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod framer;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod status;
pub mod writer;
