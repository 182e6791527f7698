//! Server-side TLS context for DNS-over-TLS.
//!
//! Built once at startup from PEM files and shared read-only by every
//! connection. Server authentication only, no client certificates.

use ferrous_dot_domain::DomainError;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;
use tracing::info;

#[derive(Clone)]
pub struct TlsContext {
    acceptor: TlsAcceptor,
}

impl TlsContext {
    pub fn from_files(
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
    ) -> Result<Self, DomainError> {
        let cert_path = cert_path.as_ref();
        let key_path = key_path.as_ref();

        let cert_pem = fs::read(cert_path).map_err(|e| {
            DomainError::TlsConfig(format!(
                "Failed to read certificate file {}: {}",
                cert_path.display(),
                e
            ))
        })?;
        let key_pem = fs::read(key_path).map_err(|e| {
            DomainError::TlsConfig(format!(
                "Failed to read key file {}: {}",
                key_path.display(),
                e
            ))
        })?;

        let context = Self::from_pem(&cert_pem, &key_pem)?;
        info!(
            cert_file = %cert_path.display(),
            key_file = %key_path.display(),
            "TLS context loaded"
        );
        Ok(context)
    }

    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self, DomainError> {
        let certs = load_certs(cert_pem)?;
        let key = load_key(key_pem)?;

        let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
        let config = rustls::ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| DomainError::TlsConfig(format!("Unsupported TLS versions: {}", e)))?
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| DomainError::TlsConfig(format!("Failed to build TLS config: {}", e)))?;

        Ok(Self {
            acceptor: TlsAcceptor::from(Arc::new(config)),
        })
    }

    pub fn acceptor(&self) -> TlsAcceptor {
        self.acceptor.clone()
    }
}

fn load_certs(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, DomainError> {
    let certs = rustls_pemfile::certs(&mut &pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DomainError::TlsConfig(format!("Failed to parse certificate: {}", e)))?;

    if certs.is_empty() {
        return Err(DomainError::TlsConfig(
            "No certificates found in file".to_string(),
        ));
    }

    Ok(certs)
}

fn load_key(pem: &[u8]) -> Result<PrivateKeyDer<'static>, DomainError> {
    rustls_pemfile::private_key(&mut &pem[..])
        .map_err(|e| DomainError::TlsConfig(format!("Failed to parse private key: {}", e)))?
        .ok_or_else(|| DomainError::TlsConfig("No private key found in file".to_string()))
}
