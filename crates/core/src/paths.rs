use std::path::{Path, PathBuf};

/// The five on-disk roots the pipeline reads and writes, mirroring the
/// original's compile-time constants (`FILES_DIRECTORY`, `TEMP_DIRNAME`,
/// `DIRECT_INDEX_LOCATION`, `REVERSE_INDEX_TEMP_LOCATION`,
/// `REVERSE_INDEX_LOCATION`) as configuration instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
  pub input_dir: PathBuf,
  pub temp_dir: PathBuf,
  pub direct_index_dir: PathBuf,
  pub reverse_temp_dir: PathBuf,
  pub reverse_dir: PathBuf,
}

impl Default for PipelinePaths {
  fn default() -> Self {
    Self::rooted_at(".")
  }
}

impl PipelinePaths {
  /// Build the default layout rooted at `base` (each field is `base/<name>`).
  pub fn rooted_at(base: impl AsRef<Path>) -> Self {
    let base = base.as_ref();
    Self {
      input_dir: base.join("input-files"),
      temp_dir: base.join("temp"),
      direct_index_dir: base.join("direct-index"),
      reverse_temp_dir: base.join("reverse-index-temporary"),
      reverse_dir: base.join("reverse-index"),
    }
  }

  /// The four output directories that must exist before phase 1 starts.
  /// `input_dir` is excluded: it is read, never created, by this pipeline.
  pub fn output_dirs(&self) -> [&Path; 4] {
    [
      &self.temp_dir,
      &self.direct_index_dir,
      &self.reverse_temp_dir,
      &self.reverse_dir,
    ]
  }

  /// Create all four output directories, returning the first failure.
  ///
  /// A startup failure here is fatal per spec §3 ("Lifecycle"): the caller
  /// is expected to broadcast kill and exit without processing.
  pub fn create_output_dirs(&self) -> std::io::Result<()> {
    for dir in self.output_dirs() {
      std::fs::create_dir_all(dir)?;
    }
    Ok(())
  }

  pub fn temp_dir_for(&self, document: &str) -> PathBuf {
    self.temp_dir.join(document)
  }

  pub fn direct_index_path(&self, document: &str) -> PathBuf {
    self.direct_index_dir.join(document)
  }

  pub fn reverse_temp_dir_for(&self, token: &str) -> PathBuf {
    self.reverse_temp_dir.join(token)
  }

  pub fn reverse_index_path(&self, token: &str) -> PathBuf {
    self.reverse_dir.join(token)
  }

  pub fn input_path(&self, document: &str) -> PathBuf {
    self.input_dir.join(document)
  }
}
