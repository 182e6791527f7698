use ferrous_dot_domain::dns_header::DNS_HEADER_LEN;
use ferrous_dot_domain::{DnsQuery, ResponseCode};

const QR: u8 = 0x80;
const RD: u8 = 0x01;

/// Builds a SERVFAIL reply directly in wire format.
///
/// Identifier, opcode, RD and the question section are echoed from the query.
/// Only QR is added; RA stays clear and the answer, authority and additional
/// sections are empty.
pub fn build_servfail_response(query: &DnsQuery) -> Vec<u8> {
    let mut buf = Vec::with_capacity(DNS_HEADER_LEN + query.question.len());

    buf.extend_from_slice(&query.id.to_be_bytes());

    let mut flags_hi = QR | ((query.opcode & 0x0F) << 3);
    if query.recursion_desired {
        flags_hi |= RD;
    }
    buf.push(flags_hi);
    buf.push(ResponseCode::ServFail.value());

    buf.extend_from_slice(&query.question_count.to_be_bytes());
    buf.extend_from_slice(&[0x00; 6]);
    buf.extend_from_slice(&query.question);

    buf
}
