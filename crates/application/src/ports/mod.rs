mod dns_codec;
mod query_forwarder;
mod upstream_transport;

pub use dns_codec::{DecodedMessage, DnsCodec};
pub use query_forwarder::QueryForwarder;
pub use upstream_transport::{TransportResponse, UpstreamTransport};

// Re-export for convenience
pub use ferrous_dot_domain::DnsQuery;
