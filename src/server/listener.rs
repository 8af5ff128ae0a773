use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio_rustls::TlsAcceptor;
use tracing::{Instrument, info, info_span};

use crate::config::Config;
use crate::handler::Dispatcher;
use crate::http::connection::Connection;
use crate::http::framer::FramingConfig;
use crate::server::tls::load_tls_acceptor;

/// A bound listening socket plus everything a connection worker needs.
///
/// Each accepted connection gets its own task. There is no cap on how many
/// run at once.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    tls: Option<TlsAcceptor>,
    dispatcher: Arc<Dispatcher>,
    framing: FramingConfig,
}

impl Server {
    /// Binds the configured address and loads TLS material if configured.
    pub async fn bind(cfg: &Config, dispatcher: Dispatcher) -> Result<Self> {
        let tls = cfg
            .tls
            .as_ref()
            .map(|tls| load_tls_acceptor(&tls.cert_path, &tls.key_path))
            .transpose()?;

        let listener = bind_listener(&cfg.server.listen_addr, cfg.server.backlog).await?;
        let local_addr = listener.local_addr()?;

        info!(
            address = %local_addr,
            backlog = cfg.server.backlog,
            tls = tls.is_some(),
            "Listening"
        );

        Ok(Self {
            listener,
            local_addr,
            tls,
            dispatcher: Arc::new(dispatcher),
            framing: cfg.framing.to_framing_config(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections forever.
    pub async fn run(self) -> Result<()> {
        let span = info_span!("listener", address = %self.local_addr);

        async move {
            loop {
                let (socket, peer) = match self.listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };
                info!("Accepted connection from {}", peer);

                let worker = ConnectionWorker {
                    tls: self.tls.clone(),
                    dispatcher: Arc::clone(&self.dispatcher),
                    framing: self.framing,
                };
                tokio::spawn(
                    worker
                        .serve(socket, peer)
                        .instrument(info_span!("connection", peer = %peer)),
                );
            }
        }
        .instrument(span)
        .await
    }
}

struct ConnectionWorker {
    tls: Option<TlsAcceptor>,
    dispatcher: Arc<Dispatcher>,
    framing: FramingConfig,
}

impl ConnectionWorker {
    async fn serve(self, socket: TcpStream, peer: SocketAddr) {
        let result = match self.tls {
            Some(acceptor) => match acceptor.accept(socket).await {
                Ok(stream) => {
                    tracing::debug!("TLS handshake complete");
                    Connection::new(stream, self.dispatcher, self.framing)
                        .run()
                        .await
                }
                Err(e) => {
                    tracing::warn!(error = %e, "TLS handshake failed, dropping connection");
                    return;
                }
            },
            None => {
                Connection::new(socket, self.dispatcher, self.framing)
                    .run()
                    .await
            }
        };

        if let Err(e) = result {
            tracing::error!("Connection error from {}: {}", peer, e);
        }
    }
}

async fn bind_listener(addr: &str, backlog: u32) -> Result<TcpListener> {
    let addr = tokio::net::lookup_host(addr)
        .await
        .with_context(|| format!("Failed to resolve listen address {}", addr))?
        .next()
        .with_context(|| format!("Listen address {} resolved to nothing", addr))?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket
        .bind(addr)
        .with_context(|| format!("Failed to bind {}", addr))?;

    Ok(socket.listen(backlog)?)
}

/// Binds with the configured handlers and serves until the task is dropped.
pub async fn run(cfg: &Config) -> Result<()> {
    let server = Server::bind(cfg, Dispatcher::from_config(cfg)).await?;
    server.run().await
}
