use async_trait::async_trait;
use ferrous_dot_application::ports::{TransportResponse, UpstreamTransport};
use ferrous_dot_domain::DomainError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamBehavior {
    /// Echo the query back as a NOERROR response with one answer
    Answer,
    Timeout,
    Refused,
    /// Reply with a different transaction id
    WrongId,
    /// Reply without the QR bit
    NotAResponse,
    /// Reply that fails the strict decode
    Malformed,
}

pub struct MockTransport {
    behavior: Mutex<UpstreamBehavior>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    timeouts_seen: Arc<Mutex<Vec<Duration>>>,
    call_count: Arc<AtomicU64>,
}

impl MockTransport {
    pub fn new(behavior: UpstreamBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            sent: Arc::new(Mutex::new(Vec::new())),
            timeouts_seen: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn set_behavior(&self, behavior: UpstreamBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }

    pub fn timeouts_seen(&self) -> Vec<Duration> {
        self.timeouts_seen.lock().unwrap().clone()
    }

    fn answer_for(query: &[u8]) -> Vec<u8> {
        let mut response = query.to_vec();
        response[2] |= 0x80;
        response[3] = 0x80;
        response[6] = 0x00;
        response[7] = 0x01;
        response
    }
}

#[async_trait]
impl UpstreamTransport for MockTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.sent.lock().unwrap().push(message_bytes.to_vec());
        self.timeouts_seen.lock().unwrap().push(timeout);

        let behavior = *self.behavior.lock().unwrap();
        let bytes = match behavior {
            UpstreamBehavior::Answer => Self::answer_for(message_bytes),
            UpstreamBehavior::Timeout => {
                return Err(DomainError::TransportTimeout {
                    server: self.server(),
                })
            }
            UpstreamBehavior::Refused => {
                return Err(DomainError::TransportConnectionRefused {
                    server: self.server(),
                })
            }
            UpstreamBehavior::WrongId => {
                let mut response = Self::answer_for(message_bytes);
                response[0] ^= 0xFF;
                response
            }
            UpstreamBehavior::NotAResponse => message_bytes.to_vec(),
            UpstreamBehavior::Malformed => {
                let mut response = Self::answer_for(message_bytes);
                response.truncate(12);
                response.extend_from_slice(super::MALFORMED_MARKER);
                response
            }
        };

        Ok(TransportResponse {
            bytes,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }

    fn server(&self) -> String {
        "192.0.2.53:53".to_string()
    }
}
