//! Coordinator lifecycle: create the output directories, build the
//! document table from the input listing, run phase 1, enumerate tokens,
//! run phase 2, and report what happened (spec §3, §4.1, §4.2).

mod phase1;
mod phase2;
mod metrics;

pub use metrics::Metrics;
pub use phase1::run_phase1;
pub use phase2::run_phase2;

use indexer_core::{DocumentTable, PipelineError, PipelinePaths};
use indexer_ipc::{Payload, Tag, Transport};
use std::time::Instant;
use tracing::{error, info, instrument};

pub struct Coordinator<T: Transport> {
  transport: T,
  paths: PipelinePaths,
  worker_count: usize,
}

impl<T: Transport> Coordinator<T> {
  pub fn new(transport: T, paths: PipelinePaths, worker_count: usize) -> Self {
    Self {
      transport,
      paths,
      worker_count,
    }
  }

  /// Drive the whole pipeline to completion (spec §2, §3).
  ///
  /// A directory-creation failure at startup is fatal (spec §3,
  /// "Lifecycle"): every worker is sent KILL immediately and the run ends
  /// without dispatching any document.
  #[instrument(skip_all, fields(worker_count = self.worker_count))]
  pub async fn run(&self) -> Result<Metrics, PipelineError> {
    if let Err(source) = self.paths.create_output_dirs() {
      error!(error = %source, "failed to create output directories, aborting");
      self.kill_all().await;
      return Err(PipelineError::StartupIo {
        path: self.paths.temp_dir.clone(),
        source,
      });
    }

    let filenames = list_input_documents(&self.paths.input_dir).map_err(|source| PipelineError::StartupIo {
      path: self.paths.input_dir.clone(),
      source,
    })?;
    let document_count = filenames.len();
    let mut table = DocumentTable::new(filenames);

    info!(document_count, "phase 1 starting");
    let phase1_start = Instant::now();
    run_phase1(&self.transport, &mut table).await;
    let phase1_duration = phase1_start.elapsed();

    let tokens = indexer_fs::list_sorted(&self.paths.reverse_temp_dir).unwrap_or_default();
    let token_count = tokens.len();

    info!(token_count, "phase 2 starting");
    let phase2_start = Instant::now();
    run_phase2(&self.transport, &tokens, self.worker_count).await;
    let phase2_duration = phase2_start.elapsed();

    let metrics = Metrics {
      document_count,
      token_count,
      phase1_duration,
      phase2_duration,
    };
    metrics.log();
    Ok(metrics)
  }

  async fn kill_all(&self) {
    let ranks: Vec<u32> = (1..=self.worker_count as u32).collect();
    if let Err(e) = self.transport.broadcast(&ranks, Tag::Kill, Payload::Empty).await {
      error!(error = %e, "failed to broadcast kill during startup-failure shutdown");
    }
  }
}

/// Sorted listing of the input directory's filenames (spec §3, "Lifecycle":
/// "allocate at startup after directory enumeration").
fn list_input_documents(input_dir: &std::path::Path) -> std::io::Result<Vec<String>> {
  indexer_fs::list_sorted(input_dir)
}

#[cfg(test)]
mod tests {
  use super::*;
  use indexer_ipc::ChannelTransport;

  #[tokio::test]
  async fn empty_corpus_completes_without_dispatch() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    tokio::fs::create_dir_all(&paths.input_dir).await.unwrap();

    let mut fabric = ChannelTransport::build_fabric(1);
    let worker = fabric.pop().unwrap();
    let coordinator_transport = fabric.pop().unwrap();
    let coordinator = Coordinator::new(coordinator_transport, paths, 1);

    let metrics = coordinator.run().await.unwrap();
    assert_eq!(metrics.document_count, 0);
    assert_eq!(metrics.token_count, 0);

    let msg = worker.try_recv_any().await.unwrap();
    assert_eq!(msg.tag, Tag::Kill);
  }

  #[tokio::test]
  async fn startup_failure_broadcasts_kill_to_every_worker() {
    let tmp = tempfile::tempdir().unwrap();
    // Pre-create a file where a required output directory must go, so
    // `create_dir_all` fails.
    let paths = PipelinePaths::rooted_at(tmp.path());
    tokio::fs::write(tmp.path().join("temp"), b"not a directory").await.unwrap();

    let mut fabric = ChannelTransport::build_fabric(2);
    let w2 = fabric.pop().unwrap();
    let w1 = fabric.pop().unwrap();
    let coordinator_transport = fabric.pop().unwrap();
    let coordinator = Coordinator::new(coordinator_transport, paths, 2);

    let result = coordinator.run().await;
    assert!(result.is_err());

    assert_eq!(w1.try_recv_any().await.unwrap().tag, Tag::Kill);
    assert_eq!(w2.try_recv_any().await.unwrap().tag, Tag::Kill);
  }
}
