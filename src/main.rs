use std::io::Write;
use std::process::ExitCode;

use clap::{crate_description, Parser, ValueEnum};

use env_logger::Builder;

use log::{error, info, LevelFilter};

use dispair::{commands, ClientConfig, DispairResult, GatewayClient, WebhookClient};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Serve an HTTP interactions endpoint
    Webhook,
    /// Receive interactions over the gateway WebSocket
    Gateway,
}

#[derive(Parser, Debug)]
#[command(about=crate_description!())]
#[command(version, long_about = None)]
struct CLArgs {
    #[arg(short, long, default_value = "none")]
    loglevel: String,

    #[arg(short, long, value_enum, default_value_t = Mode::Webhook)]
    mode: Mode,

    /// Port for the interactions endpoint, overrides PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Path for the interactions endpoint, overrides INTERACTION_ENDPOINT
    #[arg(short, long)]
    endpoint: Option<String>,
}

fn init_logging(loglevel: &str) {
    let level = match loglevel.to_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        _ => None,
    };

    let mut builder = match level {
        Some(level) => {
            let mut builder = Builder::new();
            builder.filter_module("dispair", level);
            builder
        }
        None => Builder::from_env(env_logger::Env::default()),
    };

    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] <{}|{}> {}",
                buf.timestamp(),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .init();
}

async fn run(clargs: CLArgs) -> DispairResult<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(port) = clargs.port {
        config.port = port;
    }
    if let Some(endpoint) = clargs.endpoint {
        config.interaction_endpoint = endpoint;
    }

    match clargs.mode {
        Mode::Webhook => {
            let mut client = WebhookClient::new(config)?;
            client.attach_router(commands::router());
            client.run().await
        }
        Mode::Gateway => {
            let mut client = GatewayClient::new(config)?;
            client.attach_router(commands::router());
            tokio::select! {
                result = client.run() => result,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl-C, shutting down.");
                    Ok(())
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let clargs = CLArgs::parse();
    init_logging(&clargs.loglevel);

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        error!("a rustls crypto provider was already installed");
    }

    info!("Starting...");

    match run(clargs).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("client ended: {e}");
            ExitCode::FAILURE
        }
    }
}
