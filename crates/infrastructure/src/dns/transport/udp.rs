//! UDP transport to the upstream resolver (RFC 1035 §4.2.1).
//!
//! One ephemeral socket per request, one datagram sent, no retry. The whole
//! exchange shares a single deadline; datagrams from an unexpected source or
//! carrying another transaction id are discarded while waiting.

use async_trait::async_trait;
use ferrous_dot_application::ports::{TransportResponse, UpstreamTransport};
use ferrous_dot_domain::{DnsHeader, DomainError};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest datagram payload accepted from the upstream.
const MAX_UDP_RESPONSE_SIZE: usize = 65_535;

/// DNS over UDP transport
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }

    fn map_io_error(&self, context: &str, e: io::Error) -> DomainError {
        if e.kind() == io::ErrorKind::ConnectionRefused {
            DomainError::TransportConnectionRefused {
                server: self.server_addr.to_string(),
            }
        } else {
            DomainError::TransportIo {
                server: self.server_addr.to_string(),
                reason: format!("{}: {}", context, e),
            }
        }
    }

    async fn exchange(
        &self,
        socket: &UdpSocket,
        message_bytes: &[u8],
        expected_id: Option<u16>,
    ) -> Result<Vec<u8>, DomainError> {
        let bytes_sent = socket
            .send_to(message_bytes, self.server_addr)
            .await
            .map_err(|e| self.map_io_error("send", e))?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        loop {
            let (bytes_received, from_addr) = socket
                .recv_from(&mut recv_buf)
                .await
                .map_err(|e| self.map_io_error("receive", e))?;

            if from_addr != self.server_addr {
                warn!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "Discarding UDP datagram from unexpected source"
                );
                continue;
            }

            let reply_id = DnsHeader::parse(&recv_buf[..bytes_received]).map(|h| h.id);
            if expected_id.is_some() && reply_id != expected_id {
                debug!(
                    server = %self.server_addr,
                    expected_id = ?expected_id,
                    reply_id = ?reply_id,
                    "Discarding UDP reply with mismatched id"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);
            debug!(server = %self.server_addr, bytes_received, "UDP response received");
            return Ok(recv_buf);
        }
    }
}

#[async_trait]
impl UpstreamTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| self.map_io_error("bind", e))?;

        let expected_id = DnsHeader::parse(message_bytes).map(|h| h.id);

        let bytes = tokio::time::timeout(timeout, self.exchange(&socket, message_bytes, expected_id))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })??;

        Ok(TransportResponse {
            bytes,
            protocol_used: self.protocol_name(),
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }

    fn server(&self) -> String {
        self.server_addr.to_string()
    }
}
