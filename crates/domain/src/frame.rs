//! DNS-over-TCP/TLS message framing (RFC 1035 §4.2.2, RFC 7858 §3.3).
//!
//! Every message on the stream is preceded by its length as a two-byte
//! big-endian integer, so a single frame can carry at most 65535 bytes.

use crate::DomainError;

/// Size of the length prefix in bytes.
pub const FRAME_HEADER_LEN: usize = 2;

/// Largest payload the 16-bit length field can describe.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Encodes a payload length as the two-byte big-endian prefix.
///
/// Lengths above [`MAX_FRAME_LEN`] are rejected instead of being wrapped.
pub fn encode_frame_len(len: usize) -> Result<[u8; FRAME_HEADER_LEN], DomainError> {
    let len = u16::try_from(len).map_err(|_| DomainError::FrameTooLarge(len))?;
    Ok(len.to_be_bytes())
}

pub fn decode_frame_len(prefix: [u8; FRAME_HEADER_LEN]) -> usize {
    u16::from_be_bytes(prefix) as usize
}
