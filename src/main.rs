use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garage_skill::{provider, server, Dispatcher, SkillConfig};

/// Garage door smart-home skill
#[derive(Debug, Parser)]
#[command(name = "garage-skill", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Handle one directive and print the response
    Invoke {
        /// Directive JSON file (reads stdin when omitted)
        #[arg(long)]
        event: Option<PathBuf>,
    },

    /// Start the HTTP server
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `invoke` output stays clean
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("garage_skill={},tower_http=info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = SkillConfig::load(cli.config.as_deref())?;
    // The bus is connected on the first toggle
    let publisher = Arc::new(provider::LazyPublisher::new(config.publisher.clone()));
    let dispatcher = Dispatcher::new(config, publisher);

    match cli.command {
        Commands::Invoke { event } => {
            let raw = match event {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read directive from stdin")?;
                    buf
                }
            };
            let event: serde_json::Value =
                serde_json::from_str(&raw).context("Directive is not valid JSON")?;

            let response = dispatcher.handle(&event).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Serve { host, port } => {
            server::start(dispatcher, &host, port).await?;
        }
    }

    Ok(())
}
