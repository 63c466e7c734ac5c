//! caportal - REST façade over an easy-rsa certificate authority

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caportal_api::{ApiServer, ApiServerConfig};
use caportal_easyrsa::{EasyRsa, EasyRsaConfig};
use caportal_registry::{MalformedLinePolicy, Registry};

/// Expose an easy-rsa certificate authority over REST
#[derive(Parser, Debug)]
#[command(name = "caportal")]
#[command(about = "Expose an easy-rsa certificate authority over REST", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to bind the API server
    #[arg(long, env = "CAPORTAL_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Directory easy-rsa runs in; its pki/ tree lives beneath it
    #[arg(long, env = "CAPORTAL_PKI_DIR", default_value = ".")]
    pki_dir: PathBuf,

    /// Path to the easy-rsa entry script
    #[arg(long, env = "CAPORTAL_EASYRSA", default_value = "/usr/share/easy-rsa/easyrsa")]
    easyrsa: PathBuf,

    /// Upper bound in seconds on a single toolchain invocation
    #[arg(long, default_value = "60")]
    toolchain_timeout: u64,

    /// Stop reading the index at the first malformed line instead of
    /// skipping it
    #[arg(long)]
    truncate_on_malformed: bool,

    /// Disable CORS
    #[arg(long)]
    no_cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let policy = if cli.truncate_on_malformed {
        MalformedLinePolicy::Truncate
    } else {
        MalformedLinePolicy::Skip
    };
    let registry =
        Registry::new(cli.pki_dir.join("pki").join("index.txt")).with_policy(policy);
    let toolchain = EasyRsa::new(EasyRsaConfig {
        binary: cli.easyrsa,
        working_dir: cli.pki_dir.clone(),
        timeout: Duration::from_secs(cli.toolchain_timeout),
    });

    info!(
        pki_dir = %cli.pki_dir.display(),
        index = %registry.index_path().display(),
        "starting caportal"
    );

    let server = ApiServer::new(
        ApiServerConfig {
            bind_addr: cli.bind,
            enable_cors: !cli.no_cors,
        },
        registry,
        Arc::new(toolchain),
    );
    server.start().await
}
