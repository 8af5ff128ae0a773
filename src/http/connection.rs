use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::handler::Dispatcher;
use crate::http::framer::{FramingConfig, read_message};
use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// One accepted client, handled end to end.
///
/// Exactly one request is served per connection: the worker frames a
/// message, parses it, dispatches it, writes the response and closes.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    dispatcher: Arc<Dispatcher>,
    framing: FramingConfig,
}

pub enum ConnectionState {
    Reading,
    Processing,
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, dispatcher: Arc<Dispatcher>, framing: FramingConfig) -> Self {
        Self {
            stream,
            buffer: BytesMut::new(),
            state: ConnectionState::Reading,
            dispatcher,
            framing,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.buffer = read_message(&mut self.stream, &self.framing).await;
                    tracing::debug!(bytes = self.buffer.len(), "Message framed");
                    self.state = ConnectionState::Processing;
                }

                ConnectionState::Processing => {
                    let response = self.process().await;
                    tracing::info!(
                        status = response.status().as_u16(),
                        bytes = response.content().len(),
                        "Response ready"
                    );

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    // Only one request per connection
                    self.stream.shutdown().await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn process(&mut self) -> Response {
        let request = match parse_request(&self.buffer) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting malformed request");
                return Response::bad_request(e.to_string());
            }
        };

        tracing::info!(
            method = %request.method(),
            uri = %request.target(),
            version = %request.version(),
            "Request received"
        );

        dispatch(Arc::clone(&self.dispatcher), request).await
    }
}

/// Runs the handler off the async scheduler; handlers do blocking I/O.
async fn dispatch(dispatcher: Arc<Dispatcher>, request: Request) -> Response {
    match tokio::task::spawn_blocking(move || dispatcher.dispatch(&request)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Handler task failed");
            Response::internal_error("Internal server error")
        }
    }
}
