use indexer_core::PipelinePaths;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// INDEX_FILE handler (spec §4.3.2): collapse `temp/{document}/`'s sorted
/// marker listing into run-length-encoded `(token, count)` records written
/// to `direct-index/{document}`.
///
/// An empty `temp/{document}/` short-circuits without creating the output
/// file at all (spec §8, "Boundary behaviors").
pub async fn direct_index(paths: &PipelinePaths, document: &str) {
  let temp_dir = paths.temp_dir_for(document);
  let entries = match indexer_fs::list_sorted(&temp_dir) {
    Ok(entries) => entries,
    Err(e) => {
      warn!(document, error = %e, "could not enumerate temp directory");
      return;
    }
  };

  if entries.is_empty() {
    return;
  }

  let out_path = paths.direct_index_path(document);
  let mut out = match tokio::fs::File::create(&out_path).await {
    Ok(f) => f,
    Err(e) => {
      warn!(document, error = %e, "could not create direct-index output file");
      return;
    }
  };

  // One-element lookahead over the sorted marker list, run-length-encoding
  // consecutive occurrences of the same token. `last_word` is an owned
  // `String` copy of the token on every iteration (spec REDESIGN FLAG 2),
  // never a borrow of an entry that might be replaced by the next one.
  let mut last_word: Option<String> = None;
  let mut count: u64 = 0;

  for entry in entries {
    let Some((word, _timestamp)) = indexer_fs::parse_tokenize_marker(&entry) else {
      warn!(document, entry, "malformed tokenize marker, skipping");
      continue;
    };

    match &last_word {
      Some(current) if current == word => count += 1,
      _ => {
        if let Some(finished) = last_word.take()
          && let Err(e) = write_record(&mut out, &finished, count).await
        {
          warn!(document, error = %e, "failed writing direct-index record");
        }
        last_word = Some(word.to_string());
        count = 1;
      }
    }
  }

  if let Some(finished) = last_word
    && let Err(e) = write_record(&mut out, &finished, count).await
  {
    warn!(document, error = %e, "failed writing final direct-index record");
  }
}

async fn write_record(out: &mut tokio::fs::File, word: &str, count: u64) -> std::io::Result<()> {
  out.write_all(indexer_fs::direct_index_record(word, count).as_bytes()).await
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn write_markers(temp_dir: &std::path::Path, markers: &[&str]) {
    tokio::fs::create_dir_all(temp_dir).await.unwrap();
    for marker in markers {
      tokio::fs::write(temp_dir.join(marker), b"").await.unwrap();
    }
  }

  #[tokio::test]
  async fn collapses_consecutive_tokens_into_counts() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    write_markers(
      &paths.temp_dir_for("a.txt"),
      &["hello_1", "hello_2", "world_3"],
    )
    .await;

    direct_index(&paths, "a.txt").await;

    let contents = tokio::fs::read_to_string(paths.direct_index_path("a.txt")).await.unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec!["hello 2", "world 1"]);
  }

  #[tokio::test]
  async fn single_token_single_occurrence() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    write_markers(&paths.temp_dir_for("a.txt"), &["hello_1"]).await;

    direct_index(&paths, "a.txt").await;

    let contents = tokio::fs::read_to_string(paths.direct_index_path("a.txt")).await.unwrap();
    assert_eq!(contents, "hello 1\n");
  }

  #[tokio::test]
  async fn empty_temp_dir_does_not_create_output_file() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    tokio::fs::create_dir_all(paths.temp_dir_for("a.txt")).await.unwrap();

    direct_index(&paths, "a.txt").await;

    assert!(!paths.direct_index_path("a.txt").exists());
  }
}
