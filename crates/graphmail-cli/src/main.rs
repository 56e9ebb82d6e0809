mod events;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use tracing_subscriber::EnvFilter;

use graphmail::{load_config, BroadcastStatus, MailDispatcher, OutgoingEmail};

/// Send one email through Microsoft Graph using OAuth2 client credentials.
#[derive(Parser, Debug)]
#[command(name = "graphmail", version, about)]
struct Cli {
    /// Path to the JSON config file [default: <config dir>/graphmail/config.json]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recipient address
    #[arg(long)]
    to: String,

    #[arg(long)]
    subject: String,

    /// Plain-text body
    #[arg(long)]
    body: String,

    /// File to attach; overrides the configured attachment
    #[arg(long)]
    attachment: Option<PathBuf>,

    /// Print the outcome as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("graphmail").join("config.json"))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to install tracing subscriber");
    }
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to bridge log records: {}", e);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    info!("Starting graphmail v{}", env!("CARGO_PKG_VERSION"));

    let Some(config_path) = cli.config.clone().or_else(default_config_path) else {
        error!("Could not determine default config path; pass --config");
        return ExitCode::from(2);
    };

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config from {:?}: {}", config_path, e);
            return ExitCode::from(2);
        }
    };
    info!("Configuration loaded from {:?}", config_path);

    let broadcaster = Arc::new(BroadcastStatus::default());
    let bridge = events::start_status_bridge(broadcaster.subscribe());

    let dispatcher = MailDispatcher::new(Arc::new(config), broadcaster.clone());
    info!(
        "Sending as {} via {}",
        dispatcher.config().sender_address(),
        dispatcher.config().graph_base_url()
    );
    let mut email = OutgoingEmail::new(cli.to, cli.subject, cli.body);
    email.attachment = cli.attachment.or_else(|| dispatcher.attachment());

    let outcome = dispatcher.send(email).await;

    drop(dispatcher);
    drop(broadcaster);
    let _ = bridge.await;

    if cli.json {
        match serde_json::to_string(&outcome) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize outcome: {}", e),
        }
    } else {
        println!("{}", outcome.message);
    }

    if outcome.succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
