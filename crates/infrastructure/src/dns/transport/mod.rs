pub mod framing;
pub mod udp;

pub use framing::{read_length_prefix, read_payload, write_frame};
pub use udp::UdpTransport;
