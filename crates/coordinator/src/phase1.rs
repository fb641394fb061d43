//! Phase 1: drive every document through `GetWords -> DirectIndex ->
//! PreReverse` by answering free workers with the next eligible document
//! (spec §4.1).

use indexer_core::{DocumentTable, LastOperation};
use indexer_ipc::{Payload, Tag, Transport};
use tracing::{debug, instrument, warn};

/// Run the phase-1 dispatch loop to completion: while any document is
/// doable (spec §3), poll once for a message and, if one arrived, update
/// the table and hand the sender its next task.
///
/// The non-blocking receive discipline (spec §4.1, "Non-blocking receive
/// discipline") is realized here by `try_recv_any`, which never leaves a
/// request outstanding to cancel; on a miss the loop yields once so the
/// busy-poll does not starve the runtime, then iterates (spec §9, "Busy
/// polling").
pub async fn run_phase1<T: Transport>(transport: &T, table: &mut DocumentTable) {
  while table.any_doable() {
    match transport.try_recv_any().await {
      Some(message) => handle_message(transport, table, message).await,
      None => tokio::task::yield_now().await,
    }
  }
  debug_assert!(table.all_done(), "phase 1 exited without every document reaching Done");
}

async fn handle_message<T: Transport>(transport: &T, table: &mut DocumentTable, message: indexer_ipc::Message) {
  match message.tag {
    Tag::Ack => {
      // A fresh worker announcing readiness, or an idle worker with
      // nothing left to report — either way it is free for dispatch.
      dispatch_next(transport, table, message.source).await;
    }
    Tag::ProcessWords | Tag::IndexFile | Tag::ReverseIndexFile => {
      if let Some(filename) = message.payload.as_filename() {
        let new_last = completed_stage(message.tag);
        if !table.complete(filename, new_last) {
          // Spec §4.1, "Failure semantics": a completion naming a document
          // not present in the table is logged and ignored.
          warn!(filename, "completion for unknown document, ignoring");
        }
      }
      dispatch_next(transport, table, message.source).await;
    }
    other => {
      warn!(?other, rank = message.source, "unexpected tag during phase 1, ignoring");
    }
  }
}

fn completed_stage(tag: Tag) -> LastOperation {
  match tag {
    Tag::ProcessWords => LastOperation::GetWords,
    Tag::IndexFile => LastOperation::DirectIndex,
    Tag::ReverseIndexFile => LastOperation::Done,
    _ => unreachable!("completed_stage only called for document-completion tags"),
  }
}

/// The next-task rule (spec §4.1): `None -> PROCESS_WORDS`,
/// `GetWords -> INDEX_FILE`, `DirectIndex -> REVERSE_INDEX_FILE`. `Done` is
/// unreachable because a `Done` document is never eligible.
fn next_tag_for(last: LastOperation) -> Tag {
  match last {
    LastOperation::None => Tag::ProcessWords,
    LastOperation::GetWords => Tag::IndexFile,
    LastOperation::DirectIndex => Tag::ReverseIndexFile,
    LastOperation::Done => unreachable!("Done documents are never eligible"),
  }
}

/// `getNextOperation` (spec §4.1, "Dispatch policy"): the first eligible
/// record in table order. If none is eligible the worker simply gets no
/// task this round — "a dispatch to a worker whose next task's filename
/// cannot be located is impossible provided table invariants hold".
///
/// One span per dispatched document, carrying the target rank and the tag
/// for the stage being sent (spec §4.7).
#[instrument(skip_all, fields(rank = worker_rank, filename = tracing::field::Empty, stage = tracing::field::Empty))]
async fn dispatch_next<T: Transport>(transport: &T, table: &mut DocumentTable, worker_rank: u32) {
  let Some(record) = table.next_eligible() else {
    return;
  };
  let filename = record.filename.clone();
  let tag = next_tag_for(record.last);

  table.mark_in_progress(&filename, worker_rank);
  let span = tracing::Span::current();
  span.record("filename", tracing::field::display(&filename));
  span.record("stage", tracing::field::debug(tag));
  debug!(filename, worker_rank, ?tag, "dispatching");

  if let Err(e) = transport.send(worker_rank, tag, Payload::Filename(filename)).await {
    warn!(worker_rank, error = %e, "failed to dispatch task");
  }
}
