use indexer_core::PipelinePaths;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// REVERSE_INDEX_WORD handler (spec §4.3.4): enumerate
/// `reverse-index-temporary/{token}/`, parse each marker into
/// `(document, count)`, and append those pairs to `reverse-index/{token}`.
pub async fn reverse_index(paths: &PipelinePaths, token: &str) {
  let token_dir = paths.reverse_temp_dir_for(token);
  let entries = match indexer_fs::list_sorted(&token_dir) {
    Ok(entries) => entries,
    Err(e) => {
      warn!(token, error = %e, "could not enumerate reverse-index-temporary token dir");
      return;
    }
  };

  let out_path = paths.reverse_index_path(token);
  let mut out = match tokio::fs::OpenOptions::new().create(true).append(true).open(&out_path).await {
    Ok(f) => f,
    Err(e) => {
      warn!(token, error = %e, "could not open reverse-index output for append");
      return;
    }
  };

  for entry in entries {
    let Some((document, count)) = indexer_fs::parse_pre_reverse_marker(&entry) else {
      warn!(token, entry, "malformed pre-reverse marker, skipping");
      continue;
    };
    let record = indexer_fs::direct_index_record(&document, count);
    if let Err(e) = out.write_all(record.as_bytes()).await {
      warn!(token, document, error = %e, "failed writing reverse-index record");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn appends_one_record_per_marker() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    let token_dir = paths.reverse_temp_dir_for("the");
    tokio::fs::create_dir_all(&token_dir).await.unwrap();
    tokio::fs::write(token_dir.join("a.txt_1_100"), b"").await.unwrap();
    tokio::fs::write(token_dir.join("b.txt_1_200"), b"").await.unwrap();

    reverse_index(&paths, "the").await;

    let contents = tokio::fs::read_to_string(paths.reverse_index_path("the")).await.unwrap();
    let mut lines: Vec<&str> = contents.lines().collect();
    lines.sort();
    assert_eq!(lines, vec!["a.txt 1", "b.txt 1"]);
  }

  #[tokio::test]
  async fn single_document_single_token() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PipelinePaths::rooted_at(tmp.path());
    let token_dir = paths.reverse_temp_dir_for("hello");
    tokio::fs::create_dir_all(&token_dir).await.unwrap();
    tokio::fs::write(token_dir.join("a.txt_1_100"), b"").await.unwrap();

    reverse_index(&paths, "hello").await;

    let contents = tokio::fs::read_to_string(paths.reverse_index_path("hello")).await.unwrap();
    assert_eq!(contents, "a.txt 1\n");
  }
}
