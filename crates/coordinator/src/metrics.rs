//! A post-run snapshot of what the pipeline did, for the `run` command's
//! closing log line (spec §4.7, "AMBIENT").
//!
//! This is deliberately a computed-once snapshot rather than a live counter
//! exposed over a socket: the spec scopes a reporting surface, not a metrics
//! service, out (§4.7 non-goals).

use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Metrics {
  pub document_count: usize,
  pub token_count: usize,
  pub phase1_duration: Duration,
  pub phase2_duration: Duration,
}

impl Metrics {
  pub fn log(&self) {
    tracing::info!(
      documents = self.document_count,
      tokens = self.token_count,
      phase1_ms = self.phase1_duration.as_millis(),
      phase2_ms = self.phase2_duration.as_millis(),
      "pipeline run complete"
    );
  }
}
