use super::error_response::ErrorResponder;
use crate::ports::{DnsCodec, QueryForwarder, UpstreamTransport};
use async_trait::async_trait;
use ferrous_dot_domain::DomainError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn, Level};

/// Use case: relay one client query to the upstream resolver.
///
/// Every query costs exactly one upstream exchange; nothing is cached and
/// nothing is retried. Any failure along the way degrades to the
/// [`ErrorResponder`].
pub struct ForwardQueryUseCase {
    codec: Arc<dyn DnsCodec>,
    transport: Arc<dyn UpstreamTransport>,
    error_responder: ErrorResponder,
    timeout: Duration,
}

impl ForwardQueryUseCase {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(codec: Arc<dyn DnsCodec>, transport: Arc<dyn UpstreamTransport>) -> Self {
        Self {
            error_responder: ErrorResponder::new(Arc::clone(&codec)),
            codec,
            transport,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn execute(&self, query_bytes: &[u8]) -> Vec<u8> {
        match self.try_forward(query_bytes).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    error = %e,
                    upstream = %self.transport.server(),
                    protocol = self.transport.protocol_name(),
                    "Error forwarding DNS query"
                );
                self.error_responder.create_error_response(query_bytes)
            }
        }
    }

    async fn try_forward(&self, query_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let start = Instant::now();
        let query = self.codec.decode(query_bytes)?;

        if tracing::enabled!(Level::DEBUG) {
            if let Some(summary) = self.codec.recover_query(query.as_bytes()) {
                debug!(
                    id = summary.id,
                    domain = %summary.domain,
                    record_type = summary.record_type_name(),
                    upstream = %self.transport.server(),
                    "Forwarding query"
                );
            }
        }

        let response = self.transport.send(query.as_bytes(), self.timeout).await?;

        let decoded = self
            .codec
            .decode(&response.bytes)
            .map_err(|e| DomainError::InvalidDnsResponse(e.to_string()))?;

        if !decoded.header().is_response() {
            return Err(DomainError::InvalidDnsResponse(
                "Upstream reply has QR bit clear".to_string(),
            ));
        }

        if decoded.id() != query.id() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Upstream reply id {} does not match query id {}",
                decoded.id(),
                query.id()
            )));
        }

        debug!(
            id = decoded.id(),
            rcode = %decoded.response_code(),
            answers = decoded.answer_count(),
            protocol = response.protocol_used,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Received upstream response"
        );

        Ok(decoded.into_bytes())
    }
}

#[async_trait]
impl QueryForwarder for ForwardQueryUseCase {
    async fn forward(&self, query: &[u8]) -> Vec<u8> {
        self.execute(query).await
    }

    fn error_response(&self, query: &[u8]) -> Vec<u8> {
        self.error_responder.create_error_response(query)
    }
}
