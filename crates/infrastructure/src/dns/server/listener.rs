//! DoT accept loop.
//!
//! Accepts raw TCP connections, applies admission control, and hands each
//! connection to its own task where the TLS handshake and the
//! [`ConnectionHandler`] run. A slow or failing client never stalls the loop.

use super::connection::ConnectionHandler;
use super::tls::TlsContext;
use ferrous_dot_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

pub struct DotListener {
    listener: TcpListener,
    acceptor: TlsAcceptor,
    handler: Arc<ConnectionHandler>,
    handshake_timeout: Duration,
    admission: Option<Arc<Semaphore>>,
    shutdown: CancellationToken,
}

impl DotListener {
    pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(listener: TcpListener, tls: &TlsContext, handler: Arc<ConnectionHandler>) -> Self {
        Self {
            listener,
            acceptor: tls.acceptor(),
            handler,
            handshake_timeout: Self::DEFAULT_HANDSHAKE_TIMEOUT,
            admission: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_handshake_timeout(mut self, handshake_timeout: Duration) -> Self {
        self.handshake_timeout = handshake_timeout;
        self
    }

    /// `None` leaves concurrency unbounded. With `Some(n)`, connections
    /// arriving while `n` are active are closed right after accept.
    pub fn with_connection_limit(mut self, limit: Option<usize>) -> Self {
        self.admission = limit.map(|n| Arc::new(Semaphore::new(n)));
        self
    }

    pub fn with_cancellation(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        self.listener
            .local_addr()
            .map_err(|e| DomainError::IoError(format!("Failed to read listener address: {}", e)))
    }

    /// Accepts connections until the cancellation token fires.
    pub async fn run(self) {
        match self.listener.local_addr() {
            Ok(addr) => info!(
                bind_address = %addr,
                max_connections = ?self.admission.as_ref().map(|s| s.available_permits()),
                "DoT server listening"
            ),
            Err(e) => warn!(error = %e, "DoT server listening on unknown address"),
        }

        loop {
            let (tcp, peer) = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(connection) => connection,
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        continue;
                    }
                },
            };

            let permit = match &self.admission {
                Some(semaphore) => match Arc::clone(semaphore).try_acquire_owned() {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        warn!(%peer, "Connection limit reached, refusing connection");
                        drop(tcp);
                        continue;
                    }
                },
                None => None,
            };

            let acceptor = self.acceptor.clone();
            let handler = Arc::clone(&self.handler);
            let handshake_timeout = self.handshake_timeout;
            let shutdown = self.shutdown.clone();

            tokio::spawn(
                async move {
                    let _permit = permit;
                    serve_connection(tcp, peer, acceptor, handler, handshake_timeout, shutdown)
                        .await;
                }
                .instrument(info_span!("dot_connection", %peer)),
            );
        }

        info!("DoT listener stopped");
    }
}

async fn serve_connection(
    tcp: TcpStream,
    peer: SocketAddr,
    acceptor: TlsAcceptor,
    handler: Arc<ConnectionHandler>,
    handshake_timeout: Duration,
    shutdown: CancellationToken,
) {
    info!("Connection accepted");

    if let Err(e) = tcp.set_nodelay(true) {
        debug!(error = %e, "Failed to set TCP_NODELAY");
    }

    let handshake = tokio::select! {
        biased;
        _ = shutdown.cancelled() => return,
        result = tokio::time::timeout(handshake_timeout, acceptor.accept(tcp)) => result,
    };

    let tls = match handshake {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            warn!(error = %e, "TLS handshake failed");
            return;
        }
        Err(_) => {
            warn!(timeout_ms = handshake_timeout.as_millis() as u64, "TLS handshake timed out");
            return;
        }
    };

    debug!("TLS handshake completed");
    handler.run(tls, peer).await;
}
