//! Per-connection DoT session.
//!
//! One handler serves one client stream strictly sequentially:
//! read a length prefix, read the payload, forward it, write the framed reply,
//! repeat. Every read and write runs under a deadline and gives way to the
//! shutdown token. However the loop ends, the stream is shut down and dropped
//! exactly once by [`ConnectionHandler::run`].

use crate::dns::transport::{read_length_prefix, read_payload, write_frame};
use ferrous_dot_application::ports::QueryForwarder;
use ferrous_dot_domain::frame::MAX_FRAME_LEN;
use ferrous_dot_domain::DomainError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// Client closed the stream between messages
    PeerClosed,
    /// Server shutdown was requested
    Cancelled,
    Failed(DomainError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub peer: SocketAddr,
    pub queries_processed: u64,
    pub close_reason: CloseReason,
}

pub struct ConnectionHandler {
    forwarder: Arc<dyn QueryForwarder>,
    idle_timeout: Duration,
    io_timeout: Duration,
    shutdown: CancellationToken,
}

impl ConnectionHandler {
    /// How long a client may sit between messages.
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
    /// Bound on reading a declared payload and on writing a response.
    pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(forwarder: Arc<dyn QueryForwarder>) -> Self {
        Self {
            forwarder,
            idle_timeout: Self::DEFAULT_IDLE_TIMEOUT,
            io_timeout: Self::DEFAULT_IO_TIMEOUT,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_timeouts(mut self, idle_timeout: Duration, io_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self.io_timeout = io_timeout;
        self
    }

    pub fn with_cancellation(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Serves `stream` until the client leaves, misbehaves, an I/O step fails
    /// or shutdown is requested, then closes it.
    pub async fn run<S>(&self, mut stream: S, peer: SocketAddr) -> ConnectionSummary
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut queries_processed = 0u64;
        let close_reason = self.serve(&mut stream, &mut queries_processed).await;

        self.close(stream).await;

        match &close_reason {
            CloseReason::PeerClosed => {
                info!(%peer, queries_processed, "Connection closed by client");
            }
            CloseReason::Cancelled => {
                info!(%peer, queries_processed, "Connection closed for shutdown");
            }
            CloseReason::Failed(e) if e.is_peer_fault() => {
                warn!(%peer, queries_processed, error = %e, "Connection closed after client error");
            }
            CloseReason::Failed(e) => {
                error!(%peer, queries_processed, error = %e, "Connection closed after I/O failure");
            }
        }

        ConnectionSummary {
            peer,
            queries_processed,
            close_reason,
        }
    }

    async fn serve<S>(&self, stream: &mut S, queries_processed: &mut u64) -> CloseReason
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        loop {
            let len = match self
                .step(read_length_prefix(stream), self.idle_timeout, "awaiting a length prefix")
                .await
            {
                Ok(Some(len)) => len,
                Ok(None) => return CloseReason::PeerClosed,
                Err(e) => return Self::failure(e),
            };

            let query = match self
                .step(read_payload(stream, len), self.io_timeout, "reading a query payload")
                .await
            {
                Ok(query) => query,
                Err(e) => return Self::failure(e),
            };

            let response = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return CloseReason::Cancelled,
                response = self.forwarder.forward(&query) => response,
            };

            debug!(
                query_len = query.len(),
                response_len = response.len(),
                "Query answered"
            );

            if let Err(e) = self.respond(stream, &query, response).await {
                return Self::failure(e);
            }
            *queries_processed += 1;
        }
    }

    async fn respond<S>(&self, stream: &mut S, query: &[u8], response: Vec<u8>) -> Result<(), DomainError>
    where
        S: AsyncWrite + Unpin,
    {
        let response = if response.len() > MAX_FRAME_LEN {
            warn!(
                response_len = response.len(),
                "Response exceeds frame limit, answering SERVFAIL instead"
            );
            let fallback = self.forwarder.error_response(query);
            if fallback.len() > MAX_FRAME_LEN {
                Vec::new()
            } else {
                fallback
            }
        } else {
            response
        };

        self.step(write_frame(stream, &response), self.io_timeout, "writing a response")
            .await
    }

    /// Runs one I/O step under `deadline`, abandoning it on shutdown.
    async fn step<T, F>(&self, io: F, deadline: Duration, what: &'static str) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(DomainError::Cancelled),
            result = tokio::time::timeout(deadline, io) => {
                result.map_err(|_| DomainError::DeadlineElapsed(what))?
            }
        }
    }

    async fn close<S>(&self, mut stream: S)
    where
        S: AsyncWrite + Unpin,
    {
        match tokio::time::timeout(self.io_timeout, stream.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "Stream shutdown failed"),
            Err(_) => debug!("Stream shutdown timed out"),
        }
    }

    fn failure(e: DomainError) -> CloseReason {
        match e {
            DomainError::Cancelled => CloseReason::Cancelled,
            other => CloseReason::Failed(other),
        }
    }
}
