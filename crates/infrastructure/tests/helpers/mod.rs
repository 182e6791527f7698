#![allow(dead_code, unused_imports)]
mod builders;
mod dns_server_mock;
mod tls_client;

pub use builders::{frame, junk_frame, QueryBuilder};
pub use dns_server_mock::{MockBehavior, MockDnsServer};
pub use dot_harness::{DotHarness, HarnessOptions};
pub use streams::{CloseCounters, CountingStream, FailingStream};
pub use tls_client::{TestCerts, TlsClient};
