//! Pipeline configuration with per-project overrides.
//!
//! Config priority (highest first): explicit overrides passed by the CLI >
//! project-local `indexer.toml` (current directory) > user config
//! (platform config dir via `dirs`) > compiled-in defaults. Mirrors the
//! project-over-user-over-defaults precedence used throughout the pipeline's
//! ambient configuration (spec §4.6).

use crate::PipelinePaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILE: &str = "indexer.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
  #[serde(default)]
  pub input_dir: Option<PathBuf>,
  #[serde(default)]
  pub temp_dir: Option<PathBuf>,
  #[serde(default)]
  pub direct_index_dir: Option<PathBuf>,
  #[serde(default)]
  pub reverse_temp_dir: Option<PathBuf>,
  #[serde(default)]
  pub reverse_dir: Option<PathBuf>,

  /// Number of worker ranks (`N - 1`). Defaults to available parallelism
  /// minus one coordinator, with a floor of 1.
  #[serde(default)]
  pub worker_count: Option<usize>,

  /// Retry budget for a Tokenize marker-file collision (spec §2, stage 1).
  #[serde(default = "default_retry_attempts")]
  pub retry_attempts: u32,

  #[serde(default = "default_log_level")]
  pub log_level: String,
}

fn default_retry_attempts() -> u32 {
  5
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      input_dir: None,
      temp_dir: None,
      direct_index_dir: None,
      reverse_temp_dir: None,
      reverse_dir: None,
      worker_count: None,
      retry_attempts: default_retry_attempts(),
      log_level: default_log_level(),
    }
  }
}

impl PipelineConfig {
  /// Load and merge config for `project_dir`: project file, then user file,
  /// then defaults, each layer only filling in fields the previous left
  /// unset.
  pub fn load_for_project(project_dir: &Path) -> Self {
    let mut merged = Self::default();

    if let Some(user_cfg) = Self::read_file(&user_config_path()) {
      merged = merged.overlay(user_cfg);
    }
    if let Some(project_cfg) = Self::read_file(&project_dir.join(PROJECT_CONFIG_FILE)) {
      merged = merged.overlay(project_cfg);
    }
    merged
  }

  fn read_file(path: &Path) -> Option<Self> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&contents) {
      Ok(cfg) => Some(cfg),
      Err(e) => {
        tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
        None
      }
    }
  }

  /// Fields set in `other` win over `self`; used to let a more specific
  /// layer (project) override a less specific one (user defaults).
  fn overlay(self, other: Self) -> Self {
    Self {
      input_dir: other.input_dir.or(self.input_dir),
      temp_dir: other.temp_dir.or(self.temp_dir),
      direct_index_dir: other.direct_index_dir.or(self.direct_index_dir),
      reverse_temp_dir: other.reverse_temp_dir.or(self.reverse_temp_dir),
      reverse_dir: other.reverse_dir.or(self.reverse_dir),
      worker_count: other.worker_count.or(self.worker_count),
      retry_attempts: other.retry_attempts,
      log_level: other.log_level,
    }
  }

  /// Resolve this config into concrete [`PipelinePaths`], falling back to
  /// the compiled-in defaults rooted at `base` for any unset field.
  pub fn resolve_paths(&self, base: &Path) -> PipelinePaths {
    let defaults = PipelinePaths::rooted_at(base);
    PipelinePaths {
      input_dir: self.input_dir.clone().unwrap_or(defaults.input_dir),
      temp_dir: self.temp_dir.clone().unwrap_or(defaults.temp_dir),
      direct_index_dir: self.direct_index_dir.clone().unwrap_or(defaults.direct_index_dir),
      reverse_temp_dir: self.reverse_temp_dir.clone().unwrap_or(defaults.reverse_temp_dir),
      reverse_dir: self.reverse_dir.clone().unwrap_or(defaults.reverse_dir),
    }
  }

  /// Resolve `worker_count`, defaulting to available parallelism minus the
  /// coordinator's own thread, with a floor of 1.
  pub fn resolve_worker_count(&self) -> usize {
    self.worker_count.unwrap_or_else(|| {
      std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
    })
  }
}

fn user_config_path() -> PathBuf {
  dirs::config_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join("indexer-mr")
    .join("config.toml")
}
