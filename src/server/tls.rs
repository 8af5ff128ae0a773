//! TLS certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};

/// Builds a TLS acceptor from a PEM certificate chain and a PEM private key.
///
/// The certificate file may hold several blocks (leaf first). The key file
/// must hold one RSA, PKCS#8 or SEC1 key. Any failure here is a startup
/// failure.
pub fn load_tls_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor> {
    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("Certificate and private key were rejected")?;

    tracing::info!(cert = %cert_path.display(), "TLS material loaded");
    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open certificate file {}", path.display()))?;

    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse certificate file {}", path.display()))?;

    if certs.is_empty() {
        bail!("No certificates found in {}", path.display());
    }
    Ok(certs)
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open private key file {}", path.display()))?;

    rustls_pemfile::private_key(&mut BufReader::new(file))
        .with_context(|| format!("Failed to parse private key file {}", path.display()))?
        .with_context(|| format!("No private key found in {}", path.display()))
}
