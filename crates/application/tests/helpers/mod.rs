#![allow(dead_code)]
mod mock_codec;
mod mock_transport;

pub use mock_codec::{build_query, StubCodec, MALFORMED_MARKER};
pub use mock_transport::{MockTransport, UpstreamBehavior};
