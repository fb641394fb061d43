use crate::handlers;
use indexer_core::PipelinePaths;
use indexer_ipc::{Message, Payload, Tag, Transport};
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, warn};

/// One worker rank: sends an initial ACK, then loops handling requests from
/// the coordinator until it receives KILL (spec §4.3).
pub struct Worker<T: Transport> {
  transport: Arc<T>,
  coordinator_rank: u32,
  paths: PipelinePaths,
  retry_attempts: u32,
}

impl<T: Transport> Worker<T> {
  pub fn new(transport: Arc<T>, coordinator_rank: u32, paths: PipelinePaths, retry_attempts: u32) -> Self {
    Self {
      transport,
      coordinator_rank,
      paths,
      retry_attempts,
    }
  }

  /// Run until KILL, or until the transport closes.
  pub async fn run(&self) {
    if let Err(e) = self.transport.send(self.coordinator_rank, Tag::Ack, Payload::Empty).await {
      warn!(rank = self.transport.rank(), error = %e, "failed to send startup ACK");
      return;
    }

    loop {
      match self.transport.recv_any().await {
        Some(message) => {
          if self.handle(message).await.is_break() {
            debug!(rank = self.transport.rank(), "received KILL, exiting worker loop");
            break;
          }
        }
        None => break,
      }
    }
  }

  async fn handle(&self, message: Message) -> ControlFlow<()> {
    match message.tag {
      Tag::ProcessWords => {
        let Some(document) = message.payload.into_string() else {
          return ControlFlow::Continue(());
        };
        handlers::tokenize(&self.paths, &document, self.retry_attempts).await;
        self.reply(Tag::ProcessWords, Payload::Filename(document)).await;
        ControlFlow::Continue(())
      }
      Tag::IndexFile => {
        let Some(document) = message.payload.into_string() else {
          return ControlFlow::Continue(());
        };
        handlers::direct_index(&self.paths, &document).await;
        self.reply(Tag::IndexFile, Payload::Filename(document)).await;
        ControlFlow::Continue(())
      }
      Tag::ReverseIndexFile => {
        let Some(document) = message.payload.into_string() else {
          return ControlFlow::Continue(());
        };
        handlers::pre_reverse(&self.paths, &document, self.retry_attempts).await;
        self.reply(Tag::ReverseIndexFile, Payload::Filename(document)).await;
        ControlFlow::Continue(())
      }
      Tag::ReverseIndexWord => {
        let Some(token) = message.payload.into_string() else {
          return ControlFlow::Continue(());
        };
        handlers::reverse_index(&self.paths, &token).await;
        self.reply(Tag::ReverseIndexWord, Payload::Token(token)).await;
        ControlFlow::Continue(())
      }
      Tag::Kill => ControlFlow::Break(()),
      Tag::Ack => {
        // A worker never expects to receive an ACK; ignore it rather than
        // treating it as an invariant violation worth crashing over.
        ControlFlow::Continue(())
      }
    }
  }

  async fn reply(&self, tag: Tag, payload: Payload) {
    if let Err(e) = self.transport.send(self.coordinator_rank, tag, payload).await {
      warn!(rank = self.transport.rank(), error = %e, "failed to send task reply");
    }
  }
}
