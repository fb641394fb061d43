use crate::{IpcError, Message, Payload, Tag};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// The message-passing fabric, abstracted behind a trait so the coordinator
/// and workers never depend on the concrete channel type (spec §6.5).
///
/// `send` and `try_recv`/`recv` are the only operations the pipeline needs:
/// reliable, ordered, point-to-point delivery with tag-and-source matching
/// is assumed of any implementation (spec §1).
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
  /// This endpoint's stable rank.
  fn rank(&self) -> u32;

  /// Send a tagged message to `dest`, as if originating from [`Transport::rank`].
  async fn send(&self, dest: u32, tag: Tag, payload: Payload) -> Result<(), IpcError>;

  /// Send the same tagged message to every rank in `dests`.
  async fn broadcast(&self, dests: &[u32], tag: Tag, payload: Payload) -> Result<(), IpcError> {
    for &dest in dests {
      self.send(dest, tag, payload.clone()).await?;
    }
    Ok(())
  }

  /// Non-blocking receive: returns immediately, `Some` if a message was
  /// already queued. Mirrors the original's `MPI_Irecv` + `MPI_Test` +
  /// cancel-on-miss idiom (spec §4.1, "Non-blocking receive discipline");
  /// because `try_recv` never leaves a request outstanding, there is
  /// nothing to explicitly cancel.
  async fn try_recv_any(&self) -> Option<Message>;

  /// Blocking receive: the worker's suspension point (spec §5).
  async fn recv_any(&self) -> Option<Message>;
}

/// A [`Transport`] implementation backed by one `tokio::sync::mpsc`
/// unbounded channel per rank. All peers share one process, so this is the
/// natural realization of the "reliable ordered transport" the coordinator
/// and workers are written against (spec §6.5).
pub struct ChannelTransport {
  rank: u32,
  senders: Arc<HashMap<u32, mpsc::UnboundedSender<Message>>>,
  receiver: Mutex<mpsc::UnboundedReceiver<Message>>,
}

impl ChannelTransport {
  /// Build one endpoint per rank in `0..=worker_count`, rank 0 being the
  /// coordinator and `1..=worker_count` the workers.
  pub fn build_fabric(worker_count: usize) -> Vec<ChannelTransport> {
    let mut txs = HashMap::new();
    let mut rxs = HashMap::new();
    for rank in 0..=worker_count as u32 {
      let (tx, rx) = mpsc::unbounded_channel();
      txs.insert(rank, tx);
      rxs.insert(rank, rx);
    }
    let senders = Arc::new(txs);
    (0..=worker_count as u32)
      .map(|rank| ChannelTransport {
        rank,
        senders: Arc::clone(&senders),
        receiver: Mutex::new(rxs.remove(&rank).expect("channel created above")),
      })
      .collect()
  }
}

#[async_trait::async_trait]
impl Transport for ChannelTransport {
  fn rank(&self) -> u32 {
    self.rank
  }

  async fn send(&self, dest: u32, tag: Tag, payload: Payload) -> Result<(), IpcError> {
    let sender = self.senders.get(&dest).ok_or(IpcError::UnknownRank(dest))?;
    sender
      .send(Message::new(self.rank, tag, payload))
      .map_err(|_| IpcError::Closed(dest))
  }

  async fn try_recv_any(&self) -> Option<Message> {
    let mut receiver = self.receiver.lock().await;
    receiver.try_recv().ok()
  }

  async fn recv_any(&self) -> Option<Message> {
    let mut receiver = self.receiver.lock().await;
    receiver.recv().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn send_and_try_recv_roundtrip() {
    let mut fabric = ChannelTransport::build_fabric(1);
    let worker = fabric.pop().unwrap();
    let coordinator = fabric.pop().unwrap();

    coordinator
      .send(worker.rank(), Tag::ProcessWords, Payload::Filename("a.txt".into()))
      .await
      .unwrap();

    let received = worker.try_recv_any().await.unwrap();
    assert_eq!(received.source, coordinator.rank());
    assert_eq!(received.tag, Tag::ProcessWords);
    assert_eq!(received.payload.as_filename(), Some("a.txt"));
  }

  #[tokio::test]
  async fn try_recv_returns_none_when_empty() {
    let fabric = ChannelTransport::build_fabric(1);
    assert!(fabric[0].try_recv_any().await.is_none());
  }

  #[tokio::test]
  async fn unknown_rank_send_errors() {
    let fabric = ChannelTransport::build_fabric(1);
    let err = fabric[0].send(99, Tag::Kill, Payload::Empty).await.unwrap_err();
    assert!(matches!(err, IpcError::UnknownRank(99)));
  }
}
