//! Permissive query recovery.
//!
//! Walks only the header and the question section, so queries the strict
//! decoder refuses (unknown record data, bad EDNS, trailing junk) can still be
//! answered with their own identifier and question. Never panics: every read
//! is bounds-checked and any inconsistency yields `None`.

use ferrous_dot_domain::dns_header::DNS_HEADER_LEN;
use ferrous_dot_domain::{DnsHeader, DnsQuery};
use std::sync::Arc;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_WIRE_LEN: usize = 255;
const POINTER_MASK: u8 = 0xC0;
/// QTYPE + QCLASS
const QUESTION_FIXED_LEN: usize = 4;

/// Recovers the identifier, header flags and raw question section of `buf`.
///
/// Returns `None` when the buffer is shorter than a header or when the
/// `QDCOUNT` questions do not fit in it.
pub fn recover_query(buf: &[u8]) -> Option<DnsQuery> {
    let header = DnsHeader::parse(buf)?;

    let mut pos = DNS_HEADER_LEN;
    let mut domain = None;
    let mut record_type = 0u16;

    for index in 0..header.question_count {
        let mut text = (index == 0).then(String::new);
        pos = walk_name(buf, pos, text.as_mut())?;

        let fixed = buf.get(pos..pos + QUESTION_FIXED_LEN)?;
        if index == 0 {
            record_type = u16::from_be_bytes([fixed[0], fixed[1]]);
            domain = text;
        }
        pos += QUESTION_FIXED_LEN;
    }

    let domain = match domain {
        Some(name) if !name.is_empty() => Arc::from(name),
        _ => Arc::from("."),
    };

    Some(DnsQuery {
        id: header.id,
        opcode: header.opcode(),
        recursion_desired: header.recursion_desired(),
        question_count: header.question_count,
        question: Arc::from(&buf[DNS_HEADER_LEN..pos]),
        domain,
        record_type,
    })
}

/// Skips one encoded name starting at `start`, returning the offset just past
/// it. A compression pointer ends the name; it must point backwards into the
/// message body. Labels are appended to `text` when given, the pointer target
/// is not followed.
fn walk_name(buf: &[u8], start: usize, mut text: Option<&mut String>) -> Option<usize> {
    let mut pos = start;

    loop {
        let len_byte = *buf.get(pos)?;

        if len_byte & POINTER_MASK == POINTER_MASK {
            let low = *buf.get(pos + 1)?;
            let target = (((len_byte & !POINTER_MASK) as usize) << 8) | low as usize;
            if target < DNS_HEADER_LEN || target >= pos {
                return None;
            }
            return Some(pos + 2);
        }
        if len_byte & POINTER_MASK != 0 {
            return None;
        }

        let label_len = len_byte as usize;
        pos += 1;
        if label_len == 0 {
            return Some(pos);
        }
        if label_len > MAX_LABEL_LEN || pos - start + label_len + 1 > MAX_NAME_WIRE_LEN {
            return None;
        }

        let label = buf.get(pos..pos + label_len)?;
        if let Some(out) = text.as_deref_mut() {
            if !out.is_empty() {
                out.push('.');
            }
            out.extend(label.iter().map(|&b| {
                if b.is_ascii_graphic() {
                    b.to_ascii_lowercase() as char
                } else {
                    '?'
                }
            }));
        }
        pos += label_len;
    }
}
