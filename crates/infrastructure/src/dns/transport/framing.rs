//! Length-prefixed message I/O over a byte stream (RFC 7858 §3.3).
//!
//! Generic over tokio's async I/O traits so the same code drives TLS streams
//! in production and in-memory duplex pipes in tests.

use ferrous_dot_domain::frame::{decode_frame_len, encode_frame_len, FRAME_HEADER_LEN};
use ferrous_dot_domain::DomainError;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Reads the two-byte length prefix of the next message.
///
/// `Ok(None)` means the peer closed the stream cleanly between messages.
/// A stream that ends after a single prefix byte is a protocol violation.
pub async fn read_length_prefix<R>(reader: &mut R) -> Result<Option<usize>, DomainError>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; FRAME_HEADER_LEN];
    let mut filled = 0;

    while filled < FRAME_HEADER_LEN {
        let n = match reader.read(&mut prefix[filled..]).await {
            Ok(n) => n,
            // TLS peers that drop TCP without close_notify surface as UnexpectedEof
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => 0,
            Err(e) => return Err(io_error("Failed to read length prefix", e)),
        };

        if n == 0 {
            return match filled {
                0 => Ok(None),
                got => Err(DomainError::ProtocolViolation(format!(
                    "stream ended after {} of {} length-prefix bytes",
                    got, FRAME_HEADER_LEN
                ))),
            };
        }
        filled += n;
    }

    Ok(Some(decode_frame_len(prefix)))
}

/// Reads exactly `len` payload bytes. A zero length yields an empty payload.
pub async fn read_payload<R>(reader: &mut R, len: usize) -> Result<Vec<u8>, DomainError>
where
    R: AsyncRead + Unpin,
{
    let mut payload = vec![0u8; len];
    let mut filled = 0;

    while filled < len {
        let n = match reader.read(&mut payload[filled..]).await {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => 0,
            Err(e) => return Err(io_error("Failed to read DNS message", e)),
        };

        if n == 0 {
            return Err(DomainError::ProtocolViolation(format!(
                "stream ended after {} of {} declared payload bytes",
                filled, len
            )));
        }
        filled += n;
    }

    Ok(payload)
}

/// Writes `payload` behind its length prefix and flushes.
///
/// Payloads over 65535 bytes fail with [`DomainError::FrameTooLarge`] before
/// anything is written, so the stream is never left with a partial frame.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), DomainError>
where
    W: AsyncWrite + Unpin,
{
    let prefix = encode_frame_len(payload.len())?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&prefix);
    frame.extend_from_slice(payload);

    writer
        .write_all(&frame)
        .await
        .map_err(|e| io_error("Failed to write DNS message", e))?;
    writer
        .flush()
        .await
        .map_err(|e| io_error("Failed to flush stream", e))?;

    Ok(())
}

fn io_error(context: &str, e: io::Error) -> DomainError {
    DomainError::IoError(format!("{}: {}", context, e))
}
