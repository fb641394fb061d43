//! The message-passing transport, realized as reliable, ordered,
//! tag-and-source-matched in-process channels (spec §6.5).
//!
//! The transport itself is an external collaborator per spec §1 scope — the
//! coordinator and workers are written against the [`Transport`] trait, not
//! against `tokio::mpsc` directly, the same way the teacher's `Router`/
//! `Client` pair sits above a concrete socket.

mod error;
mod message;
mod tag;
mod transport;

pub use error::IpcError;
pub use message::{Message, Payload};
pub use tag::Tag;
pub use transport::{ChannelTransport, Transport};
