use std::time::{SystemTime, UNIX_EPOCH};

/// Decimal microseconds since the Unix epoch (spec §3, "Timestamps").
///
/// Two calls made in the same microsecond return the same value — that
/// collision is the whole reason stage 1's marker creation retries up to
/// five times with a freshly sampled timestamp per attempt.
pub fn micros_since_epoch() -> u128 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .expect("system clock is before the Unix epoch")
    .as_micros()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn is_monotonically_non_decreasing_across_calls() {
    let a = micros_since_epoch();
    let b = micros_since_epoch();
    assert!(b >= a);
  }
}
