//! Phase 2: dispatch each distinct token to an available worker for
//! `REVERSE_INDEX_WORD`, then broadcast `Kill` once every token has been
//! both dispatched and acknowledged (spec §4.2).

use indexer_ipc::{Payload, Tag, Transport};
use tracing::{debug, instrument};

/// Run the phase-2 dispatch loop to completion and broadcast KILL to every
/// worker rank `1..=worker_count`.
///
/// `available[r]` starts `true` for every worker (spec §4.2): the first
/// iteration can dispatch immediately, with no initial ACK required, since
/// phase 1 already left every worker idle. A non-blocking receive mirrors
/// phase 1's busy-poll discipline; a miss yields once before retrying.
///
/// Per spec REDESIGN FLAG 1, KILL is withheld until every outstanding
/// acknowledgement is received: the loop condition is
/// `cursor < tokens.len() || outstanding > 0`, so the last in-flight token
/// is always acknowledged before any worker is told to stop, unlike the
/// original's send-KILL-as-soon-as-cursor-exhausted bug.
pub async fn run_phase2<T: Transport>(transport: &T, tokens: &[String], worker_count: usize) {
  let mut available = vec![true; worker_count + 1]; // index 0 unused, ranks are 1-based
  let mut cursor = 0usize;
  let mut outstanding = 0usize;

  while cursor < tokens.len() || outstanding > 0 {
    if let Some(message) = transport.try_recv_any().await {
      match message.tag {
        Tag::ReverseIndexWord => {
          mark_available(&mut available, message.source);
          outstanding -= 1;
        }
        other => {
          tracing::warn!(?other, rank = message.source, "unexpected tag during phase 2, ignoring");
        }
      }
    }

    if cursor < tokens.len()
      && let Some(rank) = lowest_available_rank(&available)
    {
      let token = tokens[cursor].clone();
      cursor += 1;
      outstanding += 1;
      available[rank as usize] = false;
      dispatch_token(transport, token, rank).await;
    } else if outstanding > 0 {
      tokio::task::yield_now().await;
    }
  }

  let worker_ranks: Vec<u32> = (1..=worker_count as u32).collect();
  if let Err(e) = transport.broadcast(&worker_ranks, Tag::Kill, Payload::Empty).await {
    tracing::warn!(error = %e, "failed to broadcast kill");
  }
}

/// One span per dispatched token, carrying the target rank and the stage
/// tag (spec §4.7).
#[instrument(skip(transport), fields(stage = ?Tag::ReverseIndexWord))]
async fn dispatch_token<T: Transport>(transport: &T, token: String, rank: u32) {
  debug!(token, rank, "dispatching token");
  if let Err(e) = transport.send(rank, Tag::ReverseIndexWord, Payload::Token(token)).await {
    tracing::warn!(rank, error = %e, "failed to dispatch token");
  }
}

fn mark_available(available: &mut [bool], rank: u32) {
  if let Some(slot) = available.get_mut(rank as usize) {
    *slot = true;
  }
}

/// Tie-break rule (spec §4.2, "Worker selection"): the lowest-ranked
/// available worker.
fn lowest_available_rank(available: &[bool]) -> Option<u32> {
  available
    .iter()
    .enumerate()
    .skip(1)
    .find(|(_, &free)| free)
    .map(|(rank, _)| rank as u32)
}

#[cfg(test)]
mod tests {
  use super::*;
  use indexer_ipc::ChannelTransport;

  #[tokio::test]
  async fn dispatches_every_token_and_kills_every_worker() {
    let mut fabric = ChannelTransport::build_fabric(2);
    let w2 = fabric.pop().unwrap();
    let w1 = fabric.pop().unwrap();
    let coordinator = fabric.pop().unwrap();

    let tokens = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];

    let driver = tokio::spawn(async move {
      let mut seen = Vec::new();
      loop {
        tokio::select! {
          biased;
          msg = w1.recv_any() => {
            let msg = msg.unwrap();
            match msg.tag {
              Tag::ReverseIndexWord => { seen.push(msg.payload.as_token().unwrap().to_string()); w1.send(0, Tag::ReverseIndexWord, msg.payload).await.unwrap(); }
              Tag::Kill => break,
              _ => {}
            }
          }
          msg = w2.recv_any() => {
            let msg = msg.unwrap();
            match msg.tag {
              Tag::ReverseIndexWord => { seen.push(msg.payload.as_token().unwrap().to_string()); w2.send(0, Tag::ReverseIndexWord, msg.payload).await.unwrap(); }
              Tag::Kill => break,
              _ => {}
            }
          }
        }
        if seen.len() == 3 {
          // drain the remaining Kill for whichever worker hasn't seen it
          let _ = tokio::time::timeout(std::time::Duration::from_millis(50), w1.recv_any()).await;
          let _ = tokio::time::timeout(std::time::Duration::from_millis(50), w2.recv_any()).await;
          break;
        }
      }
      seen
    });

    run_phase2(&coordinator, &tokens, 2).await;
    let seen = driver.await.unwrap();
    let mut seen = seen;
    seen.sort();
    assert_eq!(seen, vec!["alpha", "beta", "gamma"]);
  }

  #[tokio::test]
  async fn zero_tokens_kills_immediately_without_dispatch() {
    let mut fabric = ChannelTransport::build_fabric(1);
    let worker = fabric.pop().unwrap();
    let coordinator = fabric.pop().unwrap();

    run_phase2(&coordinator, &[], 1).await;

    let msg = worker.try_recv_any().await.unwrap();
    assert_eq!(msg.tag, Tag::Kill);
  }
}
