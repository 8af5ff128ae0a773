mod common;

use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use common::TempDir;
use hearth::config::Config;
use hearth::handler::{Dispatcher, StaticFileHandler};
use hearth::server::Server;
use hearth::server::tls::load_tls_acceptor;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};

const GET_INDEX: &[u8] = b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Client side trusting only the test CA that signed `server.crt`.
fn connector() -> TlsConnector {
    let file = File::open(fixture("ca.crt")).unwrap();
    let mut roots = RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut BufReader::new(file)) {
        roots.add(cert.unwrap()).unwrap();
    }

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

async fn start_tls_server(root: &TempDir) -> SocketAddr {
    let raw = format!(
        "server:\n  listen_addr: \"127.0.0.1:0\"\ntls:\n  cert_path: \"{}\"\n  key_path: \"{}\"\ncontent:\n  root: \"{}\"\nframing:\n  inactivity_timeout_ms: 200\n",
        fixture("server.crt").display(),
        fixture("server.key").display(),
        root.path().display(),
    );
    let cfg = Config::from_yaml_str(&raw).unwrap();

    let server = Server::bind(&cfg, Dispatcher::from_config(&cfg)).await.unwrap();
    let addr = server.local_addr();
    tokio::spawn(server.run());
    addr
}

async fn tls_request(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let stream = TcpStream::connect(addr).await.unwrap();
    let domain = ServerName::try_from("localhost").unwrap();
    let mut tls = connector().connect(domain, stream).await.unwrap();
    tls.write_all(raw).await.unwrap();

    let mut out = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), tls.read_to_end(&mut out))
        .await
        .expect("server did not close the TLS connection")
        .unwrap();
    out
}

fn site(name: &str) -> TempDir {
    let root = TempDir::new(name);
    root.write("index.html", "hi");
    root
}

#[test]
fn test_fixture_material_loads() {
    assert!(load_tls_acceptor(&fixture("server.crt"), &fixture("server.key")).is_ok());
}

#[tokio::test]
async fn test_tls_request_served() {
    let root = site("tls-served");
    let addr = start_tls_server(&root).await;

    let out = tls_request(addr, GET_INDEX).await;

    assert_eq!(
        out,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 2\r\n\r\nhi"
    );
}

#[tokio::test]
async fn test_failed_handshake_gets_no_http_response() {
    let root = site("tls-plaintext");
    let addr = start_tls_server(&root).await;

    let mut plain = TcpStream::connect(addr).await.unwrap();
    plain.write_all(GET_INDEX).await.unwrap();

    // At most a TLS alert comes back before the socket is dropped; a reset
    // instead of a clean close is fine too.
    let mut out = Vec::new();
    let _ = tokio::time::timeout(Duration::from_secs(10), plain.read_to_end(&mut out))
        .await
        .expect("server kept the plaintext connection open");
    assert!(!out.windows(8).any(|w| w == b"HTTP/1.1"));

    // The listener is still accepting
    let out = tls_request(addr, GET_INDEX).await;
    assert!(out.starts_with(b"HTTP/1.1 200 OK\r\n"));
}

#[test]
fn test_missing_certificate_file() {
    let result = load_tls_acceptor(
        Path::new("/nonexistent/server.crt"),
        Path::new("/nonexistent/server.key"),
    );

    let message = format!("{:#}", result.err().unwrap());
    assert!(message.contains("Failed to open certificate file"));
}

#[test]
fn test_certificate_file_without_pem_blocks() {
    let dir = TempDir::new("tls-empty-cert");
    let cert = dir.write("server.crt", "not a certificate\n");
    let key = dir.write("server.key", "not a key\n");

    let message = format!("{:#}", load_tls_acceptor(&cert, &key).err().unwrap());
    assert!(message.contains("No certificates found"));
}

#[test]
fn test_key_file_without_key() {
    let dir = TempDir::new("tls-empty-key");
    // Syntactically a PEM certificate block; content is never validated
    // because loading stops at the missing key.
    let cert = dir.write(
        "server.crt",
        "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n",
    );
    let key = dir.write("server.key", "nothing here\n");

    let message = format!("{:#}", load_tls_acceptor(&cert, &key).err().unwrap());
    assert!(message.contains("No private key found"));
}

#[tokio::test]
async fn test_bind_fails_on_bad_tls_material() {
    let dir = TempDir::new("tls-bind");
    let raw = format!(
        "server:\n  listen_addr: \"127.0.0.1:0\"\ntls:\n  cert_path: \"{}\"\n  key_path: \"{}\"\n",
        dir.path().join("missing.crt").display(),
        dir.path().join("missing.key").display(),
    );
    let cfg = Config::from_yaml_str(&raw).unwrap();

    let result = Server::bind(&cfg, Dispatcher::new(StaticFileHandler::new(dir.path()))).await;

    assert!(result.is_err());
}
