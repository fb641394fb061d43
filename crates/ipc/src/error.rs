use thiserror::Error;

#[derive(Error, Debug)]
pub enum IpcError {
  #[error("no peer registered for rank {0}")]
  UnknownRank(u32),
  #[error("channel to rank {0} is closed")]
  Closed(u32),
}
