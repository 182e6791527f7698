pub mod connection;
pub mod listener;
pub mod tls;

pub use connection::{CloseReason, ConnectionHandler, ConnectionSummary};
pub use listener::DotListener;
pub use tls::TlsContext;
