//! `indexer-mr` - a distributed, filesystem-backed inverted-index builder.

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indexer_coordinator::Coordinator;
use indexer_core::{PipelineConfig, PipelineError};
use indexer_ipc::ChannelTransport;
use indexer_worker::Worker;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "indexer-mr")]
#[command(about = "Distributed inverted-index builder over a filesystem corpus")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the pipeline: tokenize, direct-index, and reverse-index every
  /// document under the input directory.
  Run {
    /// Number of worker ranks (default: available parallelism - 1).
    #[arg(long)]
    workers: Option<usize>,
    /// Override the input directory.
    #[arg(long, value_name = "DIR")]
    input_dir: Option<PathBuf>,
  },
  /// Inspect the on-disk config and direct/reverse index outputs.
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
  /// Look up an entry in one of the built indexes.
  Inspect {
    #[command(subcommand)]
    command: InspectCommand,
  },
}

#[derive(Subcommand)]
enum ConfigCommand {
  /// Write a project-local `indexer.toml` with the resolved defaults.
  Init,
  /// Print the effective, merged configuration as TOML.
  Show,
}

#[derive(Subcommand)]
enum InspectCommand {
  /// Print the reverse-index postings list for a token.
  ReverseIndex { token: String },
  /// Print the direct-index postings for a document.
  DirectIndex { document: String },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let cwd = std::env::current_dir().context("could not determine current directory")?;
  let config = PipelineConfig::load_for_project(&cwd);
  logging::init(&config.log_level);

  match cli.command {
    Commands::Run { workers, input_dir } => run(config, &cwd, workers, input_dir).await,
    Commands::Config { command } => match command {
      ConfigCommand::Init => config_init(&cwd),
      ConfigCommand::Show => config_show(&config),
    },
    Commands::Inspect { command } => match command {
      InspectCommand::ReverseIndex { token } => inspect_reverse_index(&config, &cwd, &token),
      InspectCommand::DirectIndex { document } => inspect_direct_index(&config, &cwd, &document),
    },
  }
}

async fn run(config: PipelineConfig, cwd: &std::path::Path, workers: Option<usize>, input_dir: Option<PathBuf>) -> Result<()> {
  let mut paths = config.resolve_paths(cwd);
  if let Some(input_dir) = input_dir {
    paths.input_dir = input_dir;
  }
  let worker_count = workers.unwrap_or_else(|| config.resolve_worker_count());
  tracing::info!(worker_count, input_dir = %paths.input_dir.display(), "starting pipeline run");

  let mut fabric = ChannelTransport::build_fabric(worker_count);
  // Ranks are assigned 0..=worker_count; rank 0 is the coordinator.
  let coordinator_transport = fabric.remove(0);

  let mut worker_handles = Vec::with_capacity(worker_count);
  for transport in fabric {
    let worker_paths = paths.clone();
    let retry_attempts = config.retry_attempts;
    worker_handles.push(tokio::spawn(async move {
      let worker = Worker::new(Arc::new(transport), 0, worker_paths, retry_attempts);
      worker.run().await;
    }));
  }

  let coordinator = Coordinator::new(coordinator_transport, paths, worker_count);
  let outcome = coordinator.run().await;

  for handle in worker_handles {
    let _ = handle.await;
  }

  match outcome {
    Ok(metrics) => {
      println!(
        "indexed {} document(s), {} token(s) (phase 1: {:?}, phase 2: {:?})",
        metrics.document_count, metrics.token_count, metrics.phase1_duration, metrics.phase2_duration
      );
      Ok(())
    }
    // Startup-fatal directory-creation failures already broadcast KILL and
    // unwind cleanly; this is a normal (exit 0) empty run, not a crash.
    Err(PipelineError::StartupIo { path, source }) => {
      tracing::error!(path = %path.display(), error = %source, "startup failed, exited after broadcasting kill");
      Ok(())
    }
    Err(other) => Err(other).context("pipeline run failed"),
  }
}

fn config_init(cwd: &std::path::Path) -> Result<()> {
  let path = cwd.join("indexer.toml");
  let resolved = PipelineConfig::default();
  let toml = toml::to_string_pretty(&resolved).context("failed to serialize default config")?;
  std::fs::write(&path, toml).with_context(|| format!("failed to write {}", path.display()))?;
  println!("wrote {}", path.display());
  Ok(())
}

fn config_show(config: &PipelineConfig) -> Result<()> {
  let toml = toml::to_string_pretty(config).context("failed to serialize effective config")?;
  print!("{toml}");
  Ok(())
}

fn inspect_reverse_index(config: &PipelineConfig, cwd: &std::path::Path, token: &str) -> Result<()> {
  let paths = config.resolve_paths(cwd);
  let path = paths.reverse_index_path(token);
  let contents =
    std::fs::read_to_string(&path).with_context(|| format!("no reverse-index entry for {token:?} ({})", path.display()))?;
  print!("{contents}");
  Ok(())
}

fn inspect_direct_index(config: &PipelineConfig, cwd: &std::path::Path, document: &str) -> Result<()> {
  let paths = config.resolve_paths(cwd);
  let path = paths.direct_index_path(document);
  let contents = std::fs::read_to_string(&path)
    .with_context(|| format!("no direct-index entry for {document:?} ({})", path.display()))?;
  print!("{contents}");
  Ok(())
}
