use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use graph_client::{Neo4jGraph, DEFAULT_SEARCH_LIMIT};
use graph_probe::config::{self, ConnectionConfig};
use graph_probe::driver::{self, ProbePlan, DEFAULT_QUERY};
use graph_probe::logging::{self, LogSettings, DEFAULT_LOG_FILE};
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "graph-probe",
    about = "Exercise the knowledge-graph client against Neo4j with full logging",
    version
)]
struct Cli {
    /// Free-text query to search for after ingestion
    #[arg(long, default_value = DEFAULT_QUERY)]
    query: String,

    /// Maximum number of search results
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    num_results: usize,

    /// File that receives a copy of every log line (appended)
    #[arg(long, env = "GRAPH_PROBE_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Don't read a .env file; use the process environment only
    #[arg(long)]
    no_dotenv: bool,

    /// Exit non-zero if any step failed, not only on startup or close errors
    #[arg(long)]
    strict: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&LogSettings {
        file: cli.log_file.clone(),
        directives: None,
    }) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    match probe(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    }
}

/// Returns whether the run should be considered a success.
fn probe(cli: Cli) -> Result<bool> {
    info!("🚀 Starting graph client probe with full logging...");

    if !cli.no_dotenv {
        if let Some(path) = config::load_dotenv() {
            info!("Loaded environment from {}", path.display());
        }
    }

    let cfg = ConnectionConfig::from_env()?;
    info!("Connecting to Neo4j at: {}", cfg.uri);
    info!("Using user: {}", cfg.user);

    let plan = ProbePlan {
        query: cli.query,
        num_results: cli.num_results,
        ..ProbePlan::default()
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let report = rt.block_on(async {
        info!("Initializing graph client...");
        let graph = Neo4jGraph::connect(&cfg.uri, &cfg.user, &cfg.password)
            .await
            .with_context(|| format!("failed to connect to {}", cfg.uri))?;
        anyhow::Ok(driver::run(graph, &plan).await)
    })?;

    let failures = report.failure_count();
    if failures == 0 {
        info!("✅ Test completed. Check {} for detailed logs.", cli.log_file.display());
    } else {
        info!(
            "Test completed with {failures} failed step(s). Check {} for detailed logs.",
            cli.log_file.display()
        );
    }

    Ok(!report.should_fail(cli.strict))
}
