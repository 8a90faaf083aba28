mod demo;
mod error;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crosstalk_core::{DeviceAgent, Identity, codec};
use crosstalk_net::{MAX_DATAGRAM, Transport, UdpTransport};

use crate::error::DaemonError;

/// crosstalk-device -- run one device on the broadcast domain
#[derive(Debug, Parser)]
#[command(
    name = "crosstalk-device",
    version,
    about = "Run a crosstalk device daemon",
    long_about = "Joins the broadcast domain, answers requests addressed to\n\
        its name, channel, or '*', and exposes the demo buzzer capability\n\
        set (run buzz/print, get/set duration)."
)]
struct Cli {
    /// Device name, unique on the domain
    #[arg(long, short = 'n', env = "CROSSTALK_DEVICE_NAME")]
    name: Option<String>,

    /// Starting channel
    #[arg(long, env = "CROSSTALK_DEVICE_CHANNEL")]
    channel: Option<u32>,

    /// Broadcast port shared by every participant
    #[arg(long, short = 'p', env = "CROSSTALK_PORT")]
    port: Option<u16>,

    /// Description returned for 'talk'
    #[arg(long)]
    description: Option<String>,

    /// Config file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), DaemonError> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(crosstalk_config::config_path);
    let settings =
        crosstalk_config::load(cli.config.as_deref()).map_err(|source| DaemonError::Config {
            path: config_path.display().to_string(),
            source,
        })?;

    let name = cli
        .name
        .or(settings.device.name)
        .ok_or(DaemonError::NameRequired)?;
    let channel = cli.channel.unwrap_or(settings.device.channel);
    let port = cli.port.unwrap_or(settings.net.port);
    let description = cli.description.unwrap_or(settings.device.description);

    let identity = Identity::new(name, channel)?;
    let capabilities = demo::capabilities(description, platform_string());
    let agent = DeviceAgent::new(identity, capabilities, port);

    let transport = UdpTransport::bind(port)?;
    info!(
        device = %agent.identity(),
        channel = agent.identity().channel(),
        port,
        "device running; Ctrl-C to stop"
    );

    serve(agent, transport).await
}

/// The agent loop: receive, evaluate, answer, and only then apply any
/// port rebind — the in-flight response leaves on the prior binding.
async fn serve(mut agent: DeviceAgent, mut transport: UdpTransport) -> Result<(), DaemonError> {
    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        let received = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!(device = %agent.identity(), "shutting down");
                break;
            }
            received = transport.recv(&mut buf) => received,
        };
        let (len, peer) = match received {
            Ok(received) => received,
            Err(err) => {
                warn!(%err, "receive failed");
                continue;
            }
        };
        let reaction = agent.observe(&buf[..len]);
        if let Some(response) = reaction.response {
            let payload = codec::encode_response(&response);
            if let Err(err) = transport.send_to(&payload, peer).await {
                warn!(%err, "failed to send response");
            }
        }
        if let Some(port) = reaction.rebind {
            match transport.rebind(port).await {
                Ok(()) => info!(port, "rebound to new port"),
                Err(err) => warn!(%err, port, "rebind failed; keeping the old binding"),
            }
        }
    }
    Ok(())
}

fn platform_string() -> String {
    format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
}
