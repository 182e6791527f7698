use rustls::pki_types::{CertificateDer, ServerName};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

/// Self-signed `localhost` certificate written to a temporary directory.
pub struct TestCerts {
    _dir: TempDir,
    cert_path: PathBuf,
    key_path: PathBuf,
    cert_der: CertificateDer<'static>,
}

impl TestCerts {
    pub fn generate() -> Self {
        let generated = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
            .expect("generate certificate");
        let dir = tempfile::tempdir().expect("create temp dir");
        let cert_path = dir.path().join("server.crt");
        let key_path = dir.path().join("server.key");

        std::fs::write(&cert_path, generated.cert.pem()).expect("write cert");
        std::fs::write(&key_path, generated.key_pair.serialize_pem()).expect("write key");

        Self {
            _dir: dir,
            cert_path,
            key_path,
            cert_der: generated.cert.der().clone(),
        }
    }

    pub fn cert_path(&self) -> &Path {
        &self.cert_path
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    pub fn connector(&self) -> TlsConnector {
        let mut roots = rustls::RootCertStore::empty();
        roots.add(self.cert_der.clone()).expect("trust test cert");

        let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
        let config = rustls::ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .expect("protocol versions")
            .with_root_certificates(roots)
            .with_no_client_auth();

        TlsConnector::from(Arc::new(config))
    }
}

/// DoT client speaking length-prefixed frames over TLS.
pub struct TlsClient {
    stream: TlsStream<TcpStream>,
}

impl TlsClient {
    pub async fn connect(addr: SocketAddr, certs: &TestCerts) -> std::io::Result<Self> {
        let tcp = TcpStream::connect(addr).await?;
        let server_name = ServerName::try_from("localhost").expect("server name");
        let stream = certs.connector().connect(server_name, tcp).await?;
        Ok(Self { stream })
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    /// Reads one framed reply; `None` if the server closed the stream first.
    pub async fn read_frame(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let mut prefix = [0u8; 2];
        match self.stream.read_exact(&mut prefix).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }
        let mut payload = vec![0u8; u16::from_be_bytes(prefix) as usize];
        self.stream.read_exact(&mut payload).await?;
        Ok(Some(payload))
    }

    pub async fn exchange(&mut self, query: &[u8]) -> std::io::Result<Vec<u8>> {
        self.send_raw(&super::frame(query)).await?;
        self.read_frame().await?.ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "server closed connection")
        })
    }

    pub async fn close(mut self) -> std::io::Result<()> {
        self.stream.shutdown().await
    }
}
