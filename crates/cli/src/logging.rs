//! Logging initialization for the `indexer-mr` binary (spec §4.7).

use tracing_subscriber::EnvFilter;

/// Initialize console logging at the configured level, honoring `RUST_LOG`
/// as an override.
pub fn init(log_level: &str) {
  let env_filter = EnvFilter::builder()
    .with_default_directive(parse_level(log_level).into())
    .from_env_lossy();

  tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true).init();
}

fn parse_level(level: &str) -> tracing::Level {
  match level.to_lowercase().as_str() {
    "off" | "error" => tracing::Level::ERROR,
    "warn" => tracing::Level::WARN,
    "info" => tracing::Level::INFO,
    "debug" => tracing::Level::DEBUG,
    "trace" => tracing::Level::TRACE,
    _ => tracing::Level::INFO,
  }
}
