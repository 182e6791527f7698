use std::sync::Arc;

/// What can be salvaged from a query buffer without a full decode:
/// the header fields a reply must echo and the raw question section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub id: u16,
    pub opcode: u8,
    pub recursion_desired: bool,
    pub question_count: u16,
    /// Question section exactly as received, starting at wire offset 12.
    pub question: Arc<[u8]>,
    /// First QNAME in presentation form, `"."` for the root.
    pub domain: Arc<str>,
    /// First QTYPE, `0` when the query carries no question.
    pub record_type: u16,
}

impl DnsQuery {
    pub fn has_question(&self) -> bool {
        self.question_count > 0
    }

    /// Mnemonic for the common record types, used in log fields.
    pub fn record_type_name(&self) -> &'static str {
        match self.record_type {
            1 => "A",
            2 => "NS",
            5 => "CNAME",
            6 => "SOA",
            12 => "PTR",
            15 => "MX",
            16 => "TXT",
            28 => "AAAA",
            33 => "SRV",
            43 => "DS",
            48 => "DNSKEY",
            64 => "SVCB",
            65 => "HTTPS",
            255 => "ANY",
            _ => "OTHER",
        }
    }
}
