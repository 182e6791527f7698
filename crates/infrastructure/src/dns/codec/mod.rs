//! Wire-format codec adapters for the [`DnsCodec`] port.
//!
//! [`DnsCodec`]: ferrous_dot_application::ports::DnsCodec

mod hickory;
mod lenient;
mod servfail;

pub use hickory::HickoryCodec;
pub use lenient::recover_query;
pub use servfail::build_servfail_response;
