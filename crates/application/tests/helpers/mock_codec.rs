use ferrous_dot_application::ports::{DecodedMessage, DnsCodec};
use ferrous_dot_domain::{DnsHeader, DnsQuery, DomainError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Bodies starting with this marker fail the strict decode but still
/// expose their header and question to the permissive path.
pub const MALFORMED_MARKER: &[u8] = b"\xde\xad";

/// Header-only codec: strict decode needs a header and no malformed marker,
/// recovery needs only the header.
pub struct StubCodec {
    decode_calls: Arc<AtomicU64>,
    recover_calls: Arc<AtomicU64>,
}

impl StubCodec {
    pub fn new() -> Self {
        Self {
            decode_calls: Arc::new(AtomicU64::new(0)),
            recover_calls: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn decode_calls(&self) -> u64 {
        self.decode_calls.load(Ordering::Relaxed)
    }

    pub fn recover_calls(&self) -> u64 {
        self.recover_calls.load(Ordering::Relaxed)
    }
}

impl DnsCodec for StubCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedMessage, DomainError> {
        self.decode_calls.fetch_add(1, Ordering::Relaxed);
        if bytes.len() >= 12 && bytes[12..].starts_with(MALFORMED_MARKER) {
            return Err(DomainError::InvalidDnsMessage("malformed body".to_string()));
        }
        DecodedMessage::from_wire(bytes.to_vec())
    }

    fn recover_query(&self, bytes: &[u8]) -> Option<DnsQuery> {
        self.recover_calls.fetch_add(1, Ordering::Relaxed);
        let header = DnsHeader::parse(bytes)?;
        Some(DnsQuery {
            id: header.id,
            opcode: header.opcode(),
            recursion_desired: header.recursion_desired(),
            question_count: header.question_count,
            question: Arc::from(&bytes[12..]),
            domain: "stub.test".into(),
            record_type: 1,
        })
    }

    fn build_servfail(&self, query: &DnsQuery) -> Vec<u8> {
        let mut wire = Vec::with_capacity(12 + query.question.len());
        wire.extend_from_slice(&query.id.to_be_bytes());
        wire.extend_from_slice(&[0x81, 0x02]);
        wire.extend_from_slice(&query.question_count.to_be_bytes());
        wire.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        wire.extend_from_slice(&query.question);
        wire
    }
}

/// Twelve-byte header with RD set followed by `body`.
pub fn build_query(id: u16, body: &[u8]) -> Vec<u8> {
    let mut wire = Vec::with_capacity(12 + body.len());
    wire.extend_from_slice(&id.to_be_bytes());
    wire.extend_from_slice(&[0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
    wire.extend_from_slice(body);
    wire
}
