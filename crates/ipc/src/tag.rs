/// The small, closed tag set every message is dispatched on (spec §4.1,
/// "Tag taxonomy"). Encoded as a Rust enum rather than a wire integer since
/// the transport is in-process — see [`crate::Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
  /// Worker -> coordinator: alive / idle, empty payload.
  Ack,
  /// Coordinator -> worker: run Tokenize on the named document.
  ProcessWords,
  /// Coordinator -> worker: run DirectIndex on the named document.
  IndexFile,
  /// Coordinator -> worker: run PreReverse on the named document.
  ReverseIndexFile,
  /// Coordinator <-> worker: phase-2 token work / its acknowledgement.
  ReverseIndexWord,
  /// Coordinator -> worker: exit the worker loop.
  Kill,
}
