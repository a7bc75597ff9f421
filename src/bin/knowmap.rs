//! knowmap CLI: replay exploration sessions against recorded responses.
//!
//! Usage:
//!   knowmap replay <fixture.json> [--seed-concept NAME] [--click NODE_ID]... [--config path]
//!   knowmap config-path

use clap::{Parser, Subcommand};
use knowmap::config::default_config_path;
use knowmap::{EngineConfig, NodeId, Seed, StaticApi, SyncEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "knowmap",
    version,
    about = "Incremental knowledge-graph synchronization engine"
)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a session against a JSON fixture of service responses and
    /// print the resulting graph
    Replay {
        /// Fixture file with knowledge_map / articles_by_concept / collect_failures
        fixture: PathBuf,
        /// Start from a single concept instead of the knowledge map
        #[arg(long)]
        seed_concept: Option<String>,
        /// Node ids to click, in order
        #[arg(long = "click")]
        clicks: Vec<String>,
        /// Path to a YAML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the event log instead of the graph
        #[arg(long)]
        events: bool,
    },
    /// Print where the default config file is looked up
    ConfigPath,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_replay(
    fixture: PathBuf,
    seed_concept: Option<String>,
    clicks: Vec<String>,
    config: Option<PathBuf>,
    events: bool,
) -> Result<(), String> {
    let config = EngineConfig::load_or_default(config.as_deref())
        .map_err(|e| format!("Failed to load config: {}", e))?;
    let api = StaticApi::from_fixture_file(&fixture)
        .map_err(|e| format!("Failed to load fixture {}: {}", fixture.display(), e))?;
    let engine = SyncEngine::with_config(Arc::new(api), &config);
    let seed = match seed_concept {
        Some(name) => Seed::Concept(name),
        None => Seed::Snapshot,
    };

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("failed to create tokio runtime: {}", e))?;

    rt.block_on(async {
        engine.start(&seed).await;
        for click in &clicks {
            let id = NodeId::from_string(click.as_str());
            let Some(node) = engine.node(&id) else {
                eprintln!("Warning: no node '{}' in graph, skipping", click);
                continue;
            };
            let outcome = engine.click(&id, node.kind()).await;
            tracing::info!("{} -> {:?}", click, outcome);
        }
    });

    let output = if events {
        let lines: Vec<String> = engine.take_events().iter().map(|e| format!("{:?}", e)).collect();
        lines.join("\n")
    } else {
        serde_json::to_string_pretty(&engine.snapshot())
            .map_err(|e| format!("Failed to serialize graph: {}", e))?
    };
    println!("{}", output);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let result = match cli.command {
        Commands::Replay { fixture, seed_concept, clicks, config, events } => {
            cmd_replay(fixture, seed_concept, clicks, config, events)
        }
        Commands::ConfigPath => match default_config_path() {
            Some(path) => {
                println!("{}", path.display());
                Ok(())
            }
            None => Err("no config directory on this platform".to_string()),
        },
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
