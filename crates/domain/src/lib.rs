//! Ferrous DoT Domain Layer
pub mod config;
pub mod dns_header;
pub mod dns_query;
pub mod errors;
pub mod frame;
pub mod upstream_addr;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_header::{DnsHeader, ResponseCode};
pub use dns_query::DnsQuery;
pub use errors::DomainError;
pub use upstream_addr::UpstreamAddr;
