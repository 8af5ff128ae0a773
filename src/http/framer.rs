//! Message framing by inactivity.
//!
//! The server never trusts `Content-Length` to delimit a request. Instead it
//! keeps reading until either a read comes back shorter than the buffer, or
//! the client goes quiet for the inactivity window after having sent
//! something. A client that has sent nothing yet is waited on indefinitely.
//!
//! This cannot tell a client that paused mid-message from one that has
//! finished: a sender whose gaps exceed the window gets truncated. It holds
//! up only because each connection carries exactly one request.

use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

/// Default inactivity window.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(2);

/// Default size of a single read.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Tunables for [`read_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramingConfig {
    pub inactivity_timeout: Duration,
    pub read_buffer_size: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

/// Reads from `stream` until a full message has plausibly arrived.
///
/// Always yields a buffer, possibly empty or truncated. A read error ends
/// the frame with whatever was accumulated; the parser deals with the rest.
pub async fn read_message<S>(stream: &mut S, cfg: &FramingConfig) -> BytesMut
where
    S: AsyncRead + Unpin,
{
    let buffer_size = cfg.read_buffer_size.max(1);
    let mut accumulated = BytesMut::with_capacity(buffer_size);
    let mut chunk = vec![0u8; buffer_size];

    loop {
        match timeout(cfg.inactivity_timeout, stream.read(&mut chunk)).await {
            Ok(Ok(n)) => {
                accumulated.extend_from_slice(&chunk[..n]);

                if n < buffer_size {
                    tracing::trace!(bytes = accumulated.len(), "Short read, message complete");
                    break;
                }
            }

            Ok(Err(e)) => {
                tracing::debug!(
                    error = %e,
                    bytes = accumulated.len(),
                    "Read failed, framing what has arrived"
                );
                break;
            }

            Err(_) if !accumulated.is_empty() => {
                tracing::trace!(bytes = accumulated.len(), "Client idle, message complete");
                break;
            }

            Err(_) => {
                // Nothing received yet, keep waiting
            }
        }
    }

    accumulated
}
