use std::io;
use std::path::Path;

/// List a directory's entries, sorted lexicographically (spec §6.3,
/// "Directory listings are consumed in sorted order").
///
/// `std::fs::read_dir` never yields the synthetic `.`/`..` entries the
/// original's `scandir`-based scanner had to discard explicitly, so this is
/// just a sort over the raw listing.
pub fn list_sorted(dir: &Path) -> io::Result<Vec<String>> {
  let mut names: Vec<String> = std::fs::read_dir(dir)?
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  Ok(names)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lists_entries_in_sorted_order() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["zebra", "apple", "mango"] {
      std::fs::write(tmp.path().join(name), b"").unwrap();
    }
    assert_eq!(list_sorted(tmp.path()).unwrap(), vec!["apple", "mango", "zebra"]);
  }

  #[test]
  fn empty_directory_lists_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(list_sorted(tmp.path()).unwrap().is_empty());
  }
}
