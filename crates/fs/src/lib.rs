//! Filesystem encoding helpers, the token scanner, and the directory
//! scanner shared by the coordinator and every worker handler (spec §4.4,
//! §4.5, §6.3).

mod encoding;
mod scanner;
mod timestamp;
mod tokenizer;

pub use encoding::{
  direct_index_record, parse_direct_index_record, parse_pre_reverse_marker, parse_tokenize_marker,
  pre_reverse_marker_name, tokenize_marker_name,
};
pub use scanner::list_sorted;
pub use timestamp::micros_since_epoch;
pub use tokenizer::{MAX_TOKEN_LEN, TokenScanner, tokenize};
