use super::{build_servfail_response, recover_query};
use ferrous_dot_application::ports::{DecodedMessage, DnsCodec};
use ferrous_dot_domain::{DnsQuery, DomainError};
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Codec backed by `hickory-proto` for strict decoding.
///
/// Decoded messages are re-serialized, so what gets forwarded is always a
/// message hickory could fully parse. Recovery and SERVFAIL construction work
/// on raw bytes and never go through hickory.
#[derive(Debug, Default, Clone, Copy)]
pub struct HickoryCodec;

impl HickoryCodec {
    pub fn new() -> Self {
        Self
    }

    fn serialize_message(message: &Message, size_hint: usize) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(size_hint.max(512));
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}

impl DnsCodec for HickoryCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedMessage, DomainError> {
        let message = Message::from_vec(bytes).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to parse DNS message: {}", e))
        })?;

        DecodedMessage::from_wire(Self::serialize_message(&message, bytes.len())?)
    }

    fn recover_query(&self, bytes: &[u8]) -> Option<DnsQuery> {
        recover_query(bytes)
    }

    fn build_servfail(&self, query: &DnsQuery) -> Vec<u8> {
        build_servfail_response(query)
    }
}
