use clap::Parser;
use ferrous_dot_domain::CliOverrides;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod bootstrap;
mod di;
mod server;
mod shutdown;

#[derive(Parser, Debug)]
#[command(name = "ferrous-dot")]
#[command(version)]
#[command(about = "Ferrous DoT - DNS-over-TLS proxy forwarding to a UDP resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Bind address
    #[arg(short = 'b', long = "host", value_name = "ADDR")]
    host: Option<String>,

    /// DoT listening port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// PEM certificate chain presented to clients
    #[arg(long, value_name = "FILE")]
    cert_file: Option<String>,

    /// PEM private key matching the certificate
    #[arg(long, value_name = "FILE")]
    key_file: Option<String>,

    /// Upstream resolver (ip, ip:port or host:port)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Maximum concurrent connections, 0 for unlimited
    #[arg(long)]
    max_connections: Option<usize>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            bind_address: self.host.clone(),
            port: self.port,
            max_connections: self.max_connections,
            cert_file: self.cert_file.clone(),
            key_file: self.key_file.clone(),
            upstream: self.upstream.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config);
    if !config.logging.is_known_level() {
        warn!(level = %config.logging.level, "Unknown log level, using info");
    }

    info!("Starting Ferrous DoT v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = CancellationToken::new();
    let services = di::DotServices::new(&config, &shutdown).await?;

    tokio::spawn(shutdown::cancel_on_signal(shutdown.clone()));

    server::start_dot_server(&config, services, shutdown).await?;

    info!("Server shutdown complete");
    Ok(())
}
