use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crosstalk::cli::Cli;
use crosstalk::console::{Console, ConsoleOptions};
use crosstalk::error::CliError;
use crosstalk::output::{self, RenderOptions};
use crosstalk::repl;
use crosstalk_core::{Capabilities, DEFAULT_CHANNEL, DeviceAgent, Identity};
use crosstalk_net::UdpTransport;

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
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(crosstalk_config::config_path);
    let settings =
        crosstalk_config::load(cli.config.as_deref()).map_err(|source| CliError::Config {
            path: config_path.display().to_string(),
            source,
        })?;

    let port = cli.port.unwrap_or(settings.net.port);
    let window_ms = cli.window_ms.unwrap_or(settings.console.window_ms);
    if window_ms == 0 {
        return Err(CliError::Usage {
            message: "--window-ms must be at least 1".into(),
        });
    }
    let duplicates = cli
        .duplicates
        .map_or(settings.console.duplicates, Into::into);

    let name = cli
        .name
        .or_else(|| {
            let configured = settings.console.name.clone();
            (!configured.is_empty()).then_some(configured)
        })
        .unwrap_or_else(generated_talker_name);
    let identity = Identity::new(name.clone(), DEFAULT_CHANNEL)
        .map_err(|source| CliError::Name { name, source })?;

    let capabilities = Capabilities::builder("A simple talker", platform_string()).build();
    let talker = DeviceAgent::new(identity, capabilities, port);

    let transport = UdpTransport::bind(port)?;
    let mut console = Console::new(
        transport,
        talker,
        ConsoleOptions {
            window: Duration::from_millis(window_ms),
            duplicates,
        },
    );

    let render = RenderOptions {
        format: cli.output,
        color: output::should_color(cli.color),
    };

    match cli.command {
        Some(line) => repl::run_once(&mut console, &line, render).await,
        None => repl::run(&mut console, render).await,
    }
}

/// The original consoles named themselves from a UUID prefix; keep the
/// habit — two consoles on one LAN must not collide.
fn generated_talker_name() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("Talker-{}", &id[..2])
}

fn platform_string() -> String {
    format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
}
