use crate::Tag;

/// A message payload. Spec §6.4 documents the wire taxonomy as "empty or a
/// null-terminated ASCII string bounded by `FILENAME_MAX`" — `Filename` and
/// `Token` are that string's two call sites, kept distinct because nothing
/// upstream of a handler should confuse a document name for a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
  Empty,
  Filename(String),
  Token(String),
}

impl Payload {
  pub fn as_filename(&self) -> Option<&str> {
    match self {
      Payload::Filename(f) => Some(f),
      _ => None,
    }
  }

  pub fn as_token(&self) -> Option<&str> {
    match self {
      Payload::Token(t) => Some(t),
      _ => None,
    }
  }

  pub fn into_string(self) -> Option<String> {
    match self {
      Payload::Filename(s) | Payload::Token(s) => Some(s),
      Payload::Empty => None,
    }
  }
}

/// A message in flight between the coordinator (rank 0) and a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  /// The rank that sent this message — `MPI_SOURCE` in the original.
  pub source: u32,
  pub tag: Tag,
  pub payload: Payload,
}

impl Message {
  pub fn new(source: u32, tag: Tag, payload: Payload) -> Self {
    Self { source, tag, payload }
  }

  pub fn ack(source: u32) -> Self {
    Self::new(source, Tag::Ack, Payload::Empty)
  }

  pub fn kill(source: u32) -> Self {
    Self::new(source, Tag::Kill, Payload::Empty)
  }
}
