//! Bit-exact filename and record encodings (spec §6.3).

/// `temp/{D}/{token}_{decimalMicroseconds}` — stage 1's marker filename.
pub fn tokenize_marker_name(token: &str, timestamp_us: u128) -> String {
  format!("{token}_{timestamp_us}")
}

/// Inverse of [`tokenize_marker_name`]. Tokens are `[A-Za-z0-9]+` and so
/// never contain `_`, making the first `_` the unambiguous split point
/// between token and timestamp, exactly as the DirectIndex handler expects
/// (spec §4.3.2, "splitting each filename at the first `_` separator").
pub fn parse_tokenize_marker(name: &str) -> Option<(&str, &str)> {
  name.split_once('_')
}

/// `reverse-index-temporary/{token}/{D}_{count}_{decimalMicroseconds}` —
/// stage 3's marker filename.
pub fn pre_reverse_marker_name(document: &str, count: u64, timestamp_us: u128) -> String {
  format!("{document}_{count}_{timestamp_us}")
}

/// Inverse of [`pre_reverse_marker_name`], returning `(document, count)`.
///
/// Document names may themselves contain `_`, so parsing splits from the
/// *right*: the timestamp and count fields are pure decimal digits, so the
/// last two `_`-delimited fields are unambiguous regardless of what the
/// document name contains, which is more robust than splitting from the
/// left on the first two underscores.
pub fn parse_pre_reverse_marker(name: &str) -> Option<(String, u64)> {
  let (rest, _timestamp) = name.rsplit_once('_')?;
  let (document, count) = rest.rsplit_once('_')?;
  let count = count.parse().ok()?;
  Some((document.to_string(), count))
}

/// `{token} {count}\n` — shared by `direct-index/{D}` and
/// `reverse-index/{token}` (spec §6.3).
pub fn direct_index_record(word: &str, count: u64) -> String {
  format!("{word} {count}\n")
}

/// Parse one `{word} {count}` line (no trailing newline).
pub fn parse_direct_index_record(line: &str) -> Option<(&str, u64)> {
  let (word, count) = line.split_once(' ')?;
  Some((word, count.parse().ok()?))
}
