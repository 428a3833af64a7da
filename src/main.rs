//! Server entry-point: tracing bootstrap, CLI parsing, adapter wiring.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use nnas_backend::domain::ServiceConfig;
use nnas_backend::server::{self, ServerConfig};

/// Legacy console account service.
#[derive(Debug, Parser)]
#[command(name = "nnas-backend")]
struct Args {
    /// Address and port to listen on.
    #[arg(long, env = "NNAS_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// JSON file holding the client credential allow-list and endpoint
    /// bases. Defaults to the built-in development configuration.
    #[arg(long, env = "NNAS_SERVICE_CONFIG")]
    service_config: Option<PathBuf>,
}

fn load_service_config(path: Option<&PathBuf>) -> std::io::Result<ServiceConfig> {
    let Some(path) = path else {
        return Ok(ServiceConfig::default());
    };
    let raw = std::fs::read(path)?;
    serde_json::from_slice(&raw).map_err(|err| {
        std::io::Error::other(format!(
            "failed to parse service config at {}: {err}",
            path.display()
        ))
    })
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = Args::parse();
    let service = load_service_config(args.service_config.as_ref())?;
    server::run(ServerConfig::new(args.bind, service)).await
}
