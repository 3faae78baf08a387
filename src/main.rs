//! Command-line client for Cloudflare Stream
//!
//! # Usage
//!
//! ```bash
//! cfstream list --status ready --include-counts
//! cfstream upload https://example.com/video.mp4 --name "Launch video"
//! cfstream signed-url dd5d531a12de0c724bd1275a3b2bc9c6 --expires-in 600
//! cfstream verify-webhook --signature "time=1230811200,sig1=..." --body-file body.json
//! ```
//!
//! Credentials come from the config file and `CLOUDFLARE_*` environment
//! variables. Results are printed to stdout as JSON; logs go to stderr.

use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudflare_stream::{
    StreamClient,
    cli::{self, Command},
    config::ConfigLoader,
    utils::VERSION,
};

#[derive(Parser)]
#[command(author, version = VERSION, about, long_about = None)]
#[command(name = "cfstream")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.or_else(ConfigLoader::default_path);
    let settings = ConfigLoader::new().load(config_path.as_deref())?;

    let default_filter = if cli.verbose {
        "debug"
    } else {
        settings.logging.level.as_str()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let output = match cli::run_offline(&cli.command, &settings).await? {
        Some(output) => output,
        None => {
            debug!("Creating Stream client for account {}", settings.credentials.account_id);
            let client = StreamClient::new(settings)?;
            cli::run(cli.command, &client).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output.value)?);

    if !output.success {
        std::process::exit(1);
    }

    Ok(())
}
