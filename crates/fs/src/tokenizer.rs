/// Buffer cap on an accumulated token (spec §4.4): characters beyond this
/// terminate the current token rather than being dropped — they start the
/// next token on the following call, since the scanner is still mid-run and
/// does not re-skip a leading non-alphanumeric gap (spec scenario 5).
pub const MAX_TOKEN_LEN: usize = 254;

/// A maximal-run `[A-Za-z0-9]+` scanner over a character stream.
///
/// Used both to split an input document into tokens (stage 1, Tokenize) and
/// to read `direct-index/{D}`'s whitespace-separated `word count` records
/// back into a flat token stream (stage 3, PreReverse) — the same scanner,
/// per spec §4.3.3, since digits and letters are both alphanumeric runs.
pub struct TokenScanner<I: Iterator<Item = char>> {
  chars: std::iter::Peekable<I>,
}

impl<I: Iterator<Item = char>> TokenScanner<I> {
  pub fn new(chars: I) -> Self {
    Self { chars: chars.peekable() }
  }
}

impl<I: Iterator<Item = char>> Iterator for TokenScanner<I> {
  type Item = String;

  fn next(&mut self) -> Option<String> {
    loop {
      match self.chars.peek() {
        Some(c) if c.is_ascii_alphanumeric() => break,
        Some(_) => {
          self.chars.next();
        }
        None => return None,
      }
    }

    let mut token = String::new();
    while token.len() < MAX_TOKEN_LEN {
      match self.chars.peek() {
        Some(c) if c.is_ascii_alphanumeric() => {
          token.push(*c);
          self.chars.next();
        }
        _ => break,
      }
    }
    Some(token)
  }
}

/// Convenience wrapper for scanning an owned or borrowed string.
pub fn tokenize(text: &str) -> TokenScanner<std::vec::IntoIter<char>> {
  TokenScanner::new(text.chars().collect::<Vec<_>>().into_iter())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn collect(text: &str) -> Vec<String> {
    tokenize(text).collect()
  }

  #[test]
  fn splits_on_punctuation_and_preserves_case_and_digits() {
    assert_eq!(collect("Hello, world 42!"), vec!["Hello", "world", "42"]);
  }

  #[test]
  fn skips_leading_punctuation() {
    assert_eq!(collect("   ...hello"), vec!["hello"]);
  }

  #[test]
  fn empty_input_yields_no_tokens() {
    assert_eq!(collect(""), Vec::<String>::new());
    assert_eq!(collect("   !!! ,,,"), Vec::<String>::new());
  }

  #[test]
  fn overflow_splits_into_two_tokens_without_dropping_characters() {
    let run = "a".repeat(400);
    let tokens = collect(&run);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].len(), MAX_TOKEN_LEN);
    assert_eq!(tokens[1].len(), 400 - MAX_TOKEN_LEN);
    assert_eq!(tokens[0].len() + tokens[1].len(), 400);
  }

  #[test]
  fn repeated_token_appears_once_per_occurrence() {
    assert_eq!(collect("hello hello world"), vec!["hello", "hello", "world"]);
  }
}
