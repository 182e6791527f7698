use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Transport timeout waiting on {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport I/O error with {server}: {reason}")]
    TransportIo { server: String, reason: String },

    #[error("Frame too large: {0} bytes (max 65535)")]
    FrameTooLarge(usize),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Deadline elapsed while {0}")]
    DeadlineElapsed(&'static str),

    #[error("Connection cancelled by server shutdown")]
    Cancelled,

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("TLS configuration error: {0}")]
    TlsConfig(String),
}

impl DomainError {
    /// Errors caused by the peer misbehaving rather than by local failures.
    pub fn is_peer_fault(&self) -> bool {
        matches!(self, Self::ProtocolViolation(_) | Self::DeadlineElapsed(_))
    }
}
