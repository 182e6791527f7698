use ferrous_dot_domain::dns_header::DNS_HEADER_LEN;
use ferrous_dot_domain::{DnsHeader, DnsQuery, DomainError, ResponseCode};

/// A message that passed strict decoding, held in its re-serialized wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    header: DnsHeader,
    wire: Vec<u8>,
}

impl DecodedMessage {
    pub fn from_wire(wire: Vec<u8>) -> Result<Self, DomainError> {
        let header = DnsHeader::parse(&wire).ok_or_else(|| {
            DomainError::InvalidDnsMessage(format!(
                "Encoded message shorter than {} byte header",
                DNS_HEADER_LEN
            ))
        })?;
        Ok(Self { header, wire })
    }

    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn header(&self) -> &DnsHeader {
        &self.header
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.response_code()
    }

    pub fn answer_count(&self) -> u16 {
        self.header.answer_count
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.wire
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.wire
    }
}

/// DNS wire-format codec.
///
/// `decode` is the strict path used when forwarding; `recover_query` is the
/// permissive path that only needs the header and question section, used to
/// answer messages the strict path rejected.
pub trait DnsCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedMessage, DomainError>;

    fn recover_query(&self, bytes: &[u8]) -> Option<DnsQuery>;

    fn build_servfail(&self, query: &DnsQuery) -> Vec<u8>;
}
