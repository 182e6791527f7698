pub mod codec;
pub mod server;
pub mod transport;

pub use codec::HickoryCodec;
pub use server::{
    CloseReason, ConnectionHandler, ConnectionSummary, DotListener, TlsContext,
};
pub use transport::UdpTransport;
