//! Server-side TLS for the gRPC listener.
//!
//! Builds a [`TlsAcceptor`] from three PEM files: the server certificate
//! chain, its private key, and a CA bundle. The bundle must parse, but the
//! listener never requests client certificates.

use dns_bridge_domain::{DomainError, TlsConfig};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{RootCertStore, ServerConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;
use tracing::debug;

/// gRPC runs over HTTP/2 only.
const ALPN_H2: &[u8] = b"h2";

pub fn build_tls_acceptor(config: &TlsConfig) -> Result<TlsAcceptor, DomainError> {
    let certs = load_certs(&config.cert_file)?;
    let key = load_private_key(&config.key_file)?;
    let ca_roots = load_root_store(&config.ca_file)?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());

    let mut server_config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| DomainError::Tls(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| DomainError::Tls(format!("certificate/key mismatch: {}", e)))?;

    server_config.alpn_protocols = vec![ALPN_H2.to_vec()];

    debug!(
        cert = %config.cert_file.display(),
        ca = %config.ca_file.display(),
        ca_roots = ca_roots.len(),
        "TLS acceptor ready"
    );

    Ok(TlsAcceptor::from(Arc::new(server_config)))
}

fn open(path: &Path) -> Result<BufReader<File>, DomainError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| DomainError::Tls(format!("cannot open {}: {}", path.display(), e)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, DomainError> {
    let mut reader = open(path)?;
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            DomainError::Tls(format!(
                "failed to parse certificate {}: {}",
                path.display(),
                e
            ))
        })?;

    if certs.is_empty() {
        return Err(DomainError::Tls(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certs)
}

/// Accepts PKCS#8, PKCS#1 (RSA) and SEC1 (EC) keys.
fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, DomainError> {
    let mut reader = open(path)?;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| {
            DomainError::Tls(format!(
                "failed to parse private key {}: {}",
                path.display(),
                e
            ))
        })?
        .ok_or_else(|| DomainError::Tls(format!("no private key found in {}", path.display())))
}

fn load_root_store(path: &Path) -> Result<RootCertStore, DomainError> {
    let mut roots = RootCertStore::empty();
    for cert in load_certs(path)? {
        roots.add(cert).map_err(|e| {
            DomainError::Tls(format!("invalid CA certificate in {}: {}", path.display(), e))
        })?;
    }
    Ok(roots)
}
