use anyhow::Context;
use ferrous_dot_application::use_cases::ForwardQueryUseCase;
use ferrous_dot_domain::{Config, UpstreamAddr};
use ferrous_dot_infrastructure::dns::{ConnectionHandler, HickoryCodec, TlsContext, UdpTransport};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Everything the DoT listener needs, built once at startup.
pub struct DotServices {
    pub tls: TlsContext,
    pub handler: Arc<ConnectionHandler>,
    pub upstream: SocketAddr,
}

impl DotServices {
    pub async fn new(config: &Config, shutdown: &CancellationToken) -> anyhow::Result<Self> {
        let upstream = resolve_upstream(&config.upstream.addr()?).await?;

        let tls = TlsContext::from_files(&config.tls.cert_file, &config.tls.key_file)
            .context("Failed to initialize TLS context")?;

        let forwarder = ForwardQueryUseCase::new(
            Arc::new(HickoryCodec::new()),
            Arc::new(UdpTransport::new(upstream)),
        )
        .with_timeout(config.upstream.timeout());

        let handler = ConnectionHandler::new(Arc::new(forwarder))
            .with_timeouts(config.server.idle_timeout(), config.server.io_timeout())
            .with_cancellation(shutdown.clone());

        info!(
            upstream = %upstream,
            timeout_secs = config.upstream.timeout_secs,
            "Upstream resolver configured"
        );

        Ok(Self {
            tls,
            handler: Arc::new(handler),
            upstream,
        })
    }
}

/// Hostnames are resolved once; the first address returned is used for the
/// life of the process.
async fn resolve_upstream(addr: &UpstreamAddr) -> anyhow::Result<SocketAddr> {
    if let Some(resolved) = addr.socket_addr() {
        return Ok(resolved);
    }

    let (hostname, port) = addr
        .unresolved_parts()
        .ok_or_else(|| anyhow::anyhow!("Upstream {} has no address", addr))?;

    tokio::net::lookup_host((hostname, port))
        .await
        .with_context(|| format!("Failed to resolve upstream {}", hostname))?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Upstream {} resolved to no addresses", hostname))
}
