use indexer_core::PipelinePaths;
use std::io::ErrorKind;
use tokio::fs::OpenOptions;
use tracing::warn;

/// REVERSE_INDEX_FILE handler (spec §4.3.3): read `direct-index/{document}`
/// back as `(word, count)` pairs and, for each, drop a marker file into
/// `reverse-index-temporary/{word}/` recording this document's count.
pub async fn pre_reverse(paths: &PipelinePaths, document: &str, retry_attempts: u32) {
  let path = paths.direct_index_path(document);
  let contents = match tokio::fs::read_to_string(&path).await {
    Ok(contents) => contents,
    Err(e) => {
      warn!(document, error = %e, "could not open direct-index for pre-reverse");
      return;
    }
  };

  // Same scanner as Tokenize: the file is `word count\n` repeated, and
  // both words and counts are alphanumeric runs (spec §4.3.3).
  let tokens: Vec<String> = indexer_fs::tokenize(&contents).collect();

  for pair in tokens.chunks(2) {
    let [word, count_str] = pair else {
      warn!(document, "trailing unpaired token in direct-index, skipping");
      continue;
    };
    let Ok(count) = count_str.parse::<u64>() else {
      warn!(document, word, count_str, "non-numeric count in direct-index");
      continue;
    };

    let token_dir = paths.reverse_temp_dir_for(word);
    if let Err(e) = tokio::fs::create_dir_all(&token_dir).await {
      warn!(document, word, error = %e, "could not create reverse-index-temporary token dir");
      continue;
    }

    if !create_marker(&token_dir, document, count, retry_attempts).await {
      warn!(document, word, "exhausted retries creating pre-reverse marker");
    }
  }
}

/// Retried per spec §5 ("Shared-resource policy"): concurrent PreReverse
/// workers may race on the same token directory, and a timestamp collision
/// manifests as a creation failure that is retried the same way stage 1's
/// tokenize markers are.
async fn create_marker(token_dir: &std::path::Path, document: &str, count: u64, retry_attempts: u32) -> bool {
  for _ in 0..retry_attempts {
    let timestamp = indexer_fs::micros_since_epoch();
    let marker_path = token_dir.join(indexer_fs::pre_reverse_marker_name(document, count, timestamp));
    match OpenOptions::new().write(true).create_new(true).open(&marker_path).await {
      Ok(_) => return true,
      Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
      Err(e) => {
        warn!(document, error = %e, "pre-reverse marker creation failed for a reason other than collision");
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
  async fn creates_one_marker_per_word_count_pair() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    tokio::fs::create_dir_all(&paths.direct_index_dir).await.unwrap();
    tokio::fs::write(paths.direct_index_path("a.txt"), "hello 2\nworld 1\n")
      .await
      .unwrap();

    pre_reverse(&paths, "a.txt", 5).await;

    let hello_markers = indexer_fs::list_sorted(&paths.reverse_temp_dir_for("hello")).unwrap();
    assert_eq!(hello_markers.len(), 1);
    assert_eq!(
      indexer_fs::parse_pre_reverse_marker(&hello_markers[0]),
      Some(("a.txt".to_string(), 2))
    );

    let world_markers = indexer_fs::list_sorted(&paths.reverse_temp_dir_for("world")).unwrap();
    assert_eq!(world_markers.len(), 1);
  }

  #[tokio::test]
  async fn missing_direct_index_replies_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    pre_reverse(&paths, "missing.txt", 5).await;
    assert!(!paths.reverse_temp_dir.exists() || indexer_fs::list_sorted(&paths.reverse_temp_dir).unwrap().is_empty());
  }
}
