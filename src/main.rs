//! retweeter
//!
//! Follows a set of accounts on the filter stream and retweets every
//! original tweet they post. Outcomes go to the systemd journal when it is
//! present and to stdout otherwise.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use retweeter::api::TwitterClient;
use retweeter::config::validation::validate_config;
use retweeter::config::{load_config, BotConfig, ConfigError, Credentials};
use retweeter::lifecycle::{signals, StopHandle};
use retweeter::observability;
use retweeter::Retweeter;

#[derive(Parser)]
#[command(name = "retweeter")]
#[command(about = "Retweet everything the followed accounts post", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// User id to follow (repeatable). Overrides `stream.follow`.
    #[arg(short, long = "follow")]
    follow: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BotConfig::default(),
    };
    if !cli.follow.is_empty() {
        config.stream.follow = cli.follow;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    observability::logging::init(&config.logging);
    tracing::info!("retweeter v{} starting", env!("CARGO_PKG_VERSION"));

    let logger = Arc::new(observability::logging::build_logger(&config.logging));

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => logger.fatalf(format_args!("{}", e)),
    };

    let client = match TwitterClient::new(config.stream.clone(), credentials, logger.clone()) {
        Ok(client) => client,
        Err(e) => logger.fatalf(format_args!("could not create API client: {}", e)),
    };

    let stop = StopHandle::new();
    tokio::spawn(signals::stop_on_signal(stop.clone()));

    let bot = Retweeter::new(client, logger, &config.stream);
    let stats = bot.run(stop.signal()).await;

    tracing::info!(
        retweeted = stats.retweeted,
        failed = stats.failed,
        "Shutdown complete"
    );
    Ok(())
}
