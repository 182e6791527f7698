use async_trait::async_trait;
use ferrous_dot_domain::DomainError;
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

/// One request/response exchange with the upstream resolver.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Sends `message_bytes` once and waits up to `timeout` for the matching reply.
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;

    /// Upstream address for log fields.
    fn server(&self) -> String;
}
