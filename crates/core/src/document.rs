//! The per-document state machine driven by the phase-1 coordinator.
//!
//! See spec §3 ("Data model"): `currentOperation` tracks whether a document
//! is sitting idle or is checked out by a worker; `lastOperation` tracks how
//! far along the `None -> GetWords -> DirectIndex -> Done` chain it is.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentOperation {
  Available,
  InProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LastOperation {
  None,
  GetWords,
  DirectIndex,
  Done,
}

#[derive(Debug, Clone)]
pub struct DocumentRecord {
  pub filename: String,
  pub current: CurrentOperation,
  pub last: LastOperation,
  /// Rank of the worker currently holding this document's task, if any.
  pub held_by: Option<u32>,
}

impl DocumentRecord {
  pub fn new(filename: impl Into<String>) -> Self {
    Self {
      filename: filename.into(),
      current: CurrentOperation::Available,
      last: LastOperation::None,
      held_by: None,
    }
  }

  /// A document is eligible for dispatch when it is sitting idle and has
  /// not yet reached `Done` (spec §3, "Eligibility").
  pub fn is_eligible(&self) -> bool {
    self.current == CurrentOperation::Available && self.last != LastOperation::Done
  }

  /// A document is "doable" when it is either eligible or already checked
  /// out by a worker (spec §3, "Doable").
  pub fn is_doable(&self) -> bool {
    self.is_eligible() || self.current == CurrentOperation::InProgress
  }
}

/// The coordinator's document table: an ordered list of records plus a
/// by-name index for O(1) lookups on completion receipt.
///
/// Storage order is the canonical tie-break for [`DocumentTable::next_eligible`]
/// (spec §4.1, "Dispatch policy") and must be preserved for reproducibility —
/// hence a `Vec` rather than a `HashMap` as the primary store.
#[derive(Debug, Clone)]
pub struct DocumentTable {
  records: Vec<DocumentRecord>,
  index: HashMap<String, usize>,
}

impl DocumentTable {
  /// Build a table from a list of input filenames, in listing order.
  ///
  /// Per spec REDESIGN FLAG 4, duplicate filenames are an explicit
  /// non-goal: the last entry for a given name silently wins.
  pub fn new(filenames: impl IntoIterator<Item = String>) -> Self {
    let mut records = Vec::new();
    let mut index = HashMap::new();
    for filename in filenames {
      match index.get(&filename) {
        Some(&pos) => records[pos] = DocumentRecord::new(filename),
        None => {
          index.insert(filename.clone(), records.len());
          records.push(DocumentRecord::new(filename));
        }
      }
    }
    Self { records, index }
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn records(&self) -> &[DocumentRecord] {
    &self.records
  }

  pub fn get(&self, filename: &str) -> Option<&DocumentRecord> {
    self.index.get(filename).map(|&i| &self.records[i])
  }

  /// `true` while any document is doable (spec §3, phase-1 termination).
  pub fn any_doable(&self) -> bool {
    self.records.iter().any(DocumentRecord::is_doable)
  }

  /// `true` once every document has reached `Done` (spec §8 invariant).
  pub fn all_done(&self) -> bool {
    self.records.iter().all(|r| r.last == LastOperation::Done)
  }

  /// The linear-scan dispatch policy: the first record in storage order
  /// that is eligible (spec §4.1, "Dispatch policy"). Returns `None` if
  /// none are eligible.
  pub fn next_eligible(&self) -> Option<&DocumentRecord> {
    self.records.iter().find(|r| r.is_eligible())
  }

  /// Mark a document `InProgress`, recording the owning worker rank.
  ///
  /// Returns `false` (and leaves the table untouched) if the filename is
  /// unknown — an invariant violation the caller should log and skip per
  /// spec §7.
  pub fn mark_in_progress(&mut self, filename: &str, worker_rank: u32) -> bool {
    match self.index.get(filename) {
      Some(&pos) => {
        self.records[pos].current = CurrentOperation::InProgress;
        self.records[pos].held_by = Some(worker_rank);
        true
      }
      None => false,
    }
  }

  /// Apply a completion: move the document to `Available` at the given
  /// `last` stage (or, for the final stage, `Done`/`Done`).
  ///
  /// Returns `false` if the filename is unknown; per spec §4.1 "Failure
  /// semantics", a completion naming an unknown document is logged and
  /// ignored by the caller rather than crashing the coordinator.
  pub fn complete(&mut self, filename: &str, new_last: LastOperation) -> bool {
    match self.index.get(filename) {
      Some(&pos) => {
        let record = &mut self.records[pos];
        record.current = CurrentOperation::Available;
        record.last = new_last;
        record.held_by = None;
        true
      }
      None => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fresh_table_is_all_eligible() {
    let table = DocumentTable::new(["a.txt".into(), "b.txt".into()]);
    assert!(table.any_doable());
    assert!(!table.all_done());
    assert_eq!(table.next_eligible().unwrap().filename, "a.txt");
  }

  #[test]
  fn in_progress_is_doable_but_not_eligible() {
    let mut table = DocumentTable::new(["a.txt".into()]);
    table.mark_in_progress("a.txt", 1);
    assert!(table.any_doable());
    assert!(table.next_eligible().is_none());
  }

  #[test]
  fn completion_chain_reaches_done() {
    let mut table = DocumentTable::new(["a.txt".into()]);
    table.mark_in_progress("a.txt", 1);
    table.complete("a.txt", LastOperation::GetWords);
    assert_eq!(table.get("a.txt").unwrap().last, LastOperation::GetWords);
    assert!(table.next_eligible().is_some());

    table.mark_in_progress("a.txt", 1);
    table.complete("a.txt", LastOperation::DirectIndex);
    table.mark_in_progress("a.txt", 1);
    table.complete("a.txt", LastOperation::Done);

    assert!(table.all_done());
    assert!(!table.any_doable());
  }

  #[test]
  fn unknown_completion_is_ignored() {
    let mut table = DocumentTable::new(["a.txt".into()]);
    assert!(!table.complete("ghost.txt", LastOperation::GetWords));
    assert_eq!(table.get("a.txt").unwrap().last, LastOperation::None);
  }

  #[test]
  fn duplicate_filenames_collapse_to_the_last_entry() {
    let table = DocumentTable::new(["a.txt".into(), "a.txt".into()]);
    assert_eq!(table.len(), 1);
  }

  #[test]
  fn dispatch_order_matches_storage_order() {
    let table = DocumentTable::new(["z.txt".into(), "a.txt".into()]);
    assert_eq!(table.next_eligible().unwrap().filename, "z.txt");
  }
}
