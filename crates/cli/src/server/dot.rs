use crate::di::DotServices;
use ferrous_dot_domain::Config;
use ferrous_dot_infrastructure::dns::DotListener;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Binds the DoT socket and runs the accept loop until `shutdown` fires.
/// Bind failures are returned before anything is accepted.
pub async fn start_dot_server(
    config: &Config,
    services: DotServices,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr = config.server.socket_addr()?;
    let listener = create_tcp_listener(socket_addr, config.server.listen_backlog)?;

    info!(
        bind_address = %socket_addr,
        upstream = %services.upstream,
        max_connections = config.server.max_connections,
        "Starting DoT server"
    );

    DotListener::new(listener, &services.tls, services.handler)
        .with_handshake_timeout(config.server.handshake_timeout())
        .with_connection_limit(config.server.connection_limit())
        .with_cancellation(shutdown)
        .run()
        .await;

    Ok(())
}

fn create_tcp_listener(socket_addr: SocketAddr, backlog: u32) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(socket_addr), Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(i32::try_from(backlog).unwrap_or(i32::MAX))?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
