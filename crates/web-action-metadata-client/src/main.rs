//! Web action metadata client entry point.

use std::collections::HashSet;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use web_action_metadata::search_metadata;
use web_action_metadata_client::render::render_table;
use web_action_metadata_client::types::{Event, Operation};
use web_action_metadata_client::{
    ClientConfig, FetchDispatchController, HttpFetcher, StateContainer,
};

#[derive(Parser)]
#[command(
    name = "web-action-metadata",
    about = "Fetch and aggregate web action metadata from an admin backend",
    version
)]
struct Cli {
    /// Backend base URL. Also reads WEB_ACTION_METADATA_URL.
    #[arg(long, global = true)]
    url: Option<String>,

    /// Request timeout in milliseconds. Also reads WEB_ACTION_METADATA_TIMEOUT_MS.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch metadata and print one row per route.
    Metadata {
        /// Only show routes whose name, path or function contains this text.
        #[arg(long)]
        search: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Fetch the raw action list and print it as JSON.
    Actions,

    /// Run both operations and print every published event.
    Watch,

    /// Print the resolved configuration as JSON.
    Config,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn build_controller(config: &ClientConfig) -> anyhow::Result<FetchDispatchController> {
    let fetcher = HttpFetcher::new(config.clone())?;
    let store = Arc::new(StateContainer::new());
    Ok(FetchDispatchController::new(Arc::new(fetcher), store, config))
}

/// Trigger one operation, wait for it, and fail if it published a failure.
async fn run_once(
    controller: &FetchDispatchController,
    operation: Operation,
) -> anyhow::Result<web_action_metadata_client::Snapshot> {
    let handle = controller.trigger(operation).await;
    handle.await?;

    let snapshot = controller.store().snapshot();
    if let Some(error) = &snapshot.error {
        anyhow::bail!("{operation} fetch failed: {}", error.message);
    }
    Ok(snapshot)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Metadata { search, json } => {
            let config = ClientConfig::resolve(cli.url.as_deref(), cli.timeout_ms)?;
            let controller = build_controller(&config)?;
            let snapshot = run_once(&controller, Operation::Metadata).await?;

            let metadata = snapshot.metadata.unwrap_or_default();
            let rows = search_metadata(&metadata, search.as_deref().unwrap_or(""));
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_table(rows));
            }
        }

        Commands::Actions => {
            let config = ClientConfig::resolve(cli.url.as_deref(), cli.timeout_ms)?;
            let controller = build_controller(&config)?;
            let snapshot = run_once(&controller, Operation::Actions).await?;
            let data = snapshot.data.unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Commands::Watch => {
            let config = ClientConfig::resolve(cli.url.as_deref(), cli.timeout_ms)?;
            let controller = build_controller(&config)?;
            let mut events = controller.store().events();

            for operation in Operation::ALL {
                controller.dispatch(Event::requested(operation)).await;
            }

            let mut finished = HashSet::new();
            while finished.len() < Operation::ALL.len() {
                let event = events.recv().await?;
                println!("{}", serde_json::to_string(&event)?);
                if event.is_terminal() {
                    finished.insert(event.operation());
                }
            }

            let snapshot = controller.store().snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Commands::Config => {
            let config = ClientConfig::resolve(cli.url.as_deref(), cli.timeout_ms)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                shell,
                &mut cmd,
                "web-action-metadata",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
