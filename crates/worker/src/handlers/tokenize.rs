use indexer_core::PipelinePaths;
use std::io::ErrorKind;
use tokio::fs::OpenOptions;
use tracing::warn;

/// PROCESS_WORDS handler (spec §4.3.1): split `document` into tokens and
/// write one zero-byte marker per occurrence under `temp/{document}/`.
///
/// Every failure here is per-task recoverable (spec §7): the handler logs
/// and returns so the coordinator still receives a completion reply,
/// possibly leaving a partial or empty `temp/{document}/` behind.
pub async fn tokenize(paths: &PipelinePaths, document: &str, retry_attempts: u32) {
  let input_path = paths.input_path(document);
  let contents = match tokio::fs::read_to_string(&input_path).await {
    Ok(contents) => contents,
    Err(e) => {
      warn!(document, error = %e, "could not read input document, skipping tokenize");
      return;
    }
  };

  let temp_dir = paths.temp_dir_for(document);
  if let Err(e) = tokio::fs::create_dir_all(&temp_dir).await {
    warn!(document, error = %e, "could not create temp directory for document");
    return;
  }

  for token in indexer_fs::tokenize(&contents) {
    if !create_marker(&temp_dir, &token, retry_attempts).await {
      warn!(document, token, "exhausted retries creating tokenize marker");
    }
  }
}

/// Attempt to create a uniquely-timestamped marker for one occurrence of
/// `token`, retrying up to `retry_attempts` times on a timestamp collision
/// (spec §2, stage 1: "Duplicates collide on identical timestamps").
async fn create_marker(temp_dir: &std::path::Path, token: &str, retry_attempts: u32) -> bool {
  for _ in 0..retry_attempts {
    let timestamp = indexer_fs::micros_since_epoch();
    let marker_path = temp_dir.join(indexer_fs::tokenize_marker_name(token, timestamp));
    match OpenOptions::new().write(true).create_new(true).open(&marker_path).await {
      Ok(_) => return true,
      Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
      Err(e) => {
        warn!(token, error = %e, "marker creation failed for a reason other than collision");
        return false;
      }
    }
  }
  false
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn writes_one_marker_per_occurrence() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    tokio::fs::create_dir_all(&paths.input_dir).await.unwrap();
    tokio::fs::write(paths.input_path("a.txt"), "hello hello world").await.unwrap();

    tokenize(&paths, "a.txt", 5).await;

    let markers = indexer_fs::list_sorted(&paths.temp_dir_for("a.txt")).unwrap();
    assert_eq!(markers.len(), 3);
    let words: Vec<&str> = markers
      .iter()
      .map(|m| indexer_fs::parse_tokenize_marker(m).unwrap().0)
      .collect();
    assert_eq!(words.iter().filter(|&&w| w == "hello").count(), 2);
    assert_eq!(words.iter().filter(|&&w| w == "world").count(), 1);
  }

  #[tokio::test]
  async fn missing_input_document_replies_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    tokenize(&paths, "missing.txt", 5).await;
    assert!(!paths.temp_dir_for("missing.txt").exists());
  }

  #[tokio::test]
  async fn empty_document_creates_empty_temp_dir_no_markers() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    tokio::fs::create_dir_all(&paths.input_dir).await.unwrap();
    tokio::fs::write(paths.input_path("empty.txt"), "").await.unwrap();

    tokenize(&paths, "empty.txt", 5).await;

    let markers = indexer_fs::list_sorted(&paths.temp_dir_for("empty.txt")).unwrap();
    assert!(markers.is_empty());
  }
}
