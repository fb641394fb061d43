use thiserror::Error;

/// Fatal error classes for the pipeline (spec §7, "Startup fatal" and
/// "Transport-level"). Per-task recoverable errors are deliberately *not*
/// modeled here — they are logged and swallowed by the worker handlers so
/// the state machine always advances (spec §7, "Propagation").
#[derive(Error, Debug)]
pub enum PipelineError {
  #[error("failed to create output directory {path}: {source}")]
  StartupIo {
    path: std::path::PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("transport error: {0}")]
  Transport(String),
  #[error("config error: {0}")]
  Config(String),
}
