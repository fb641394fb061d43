//! Worker task handlers and the worker's receive loop (spec §4.3).
//!
//! Workers are stateless between tasks: every handler takes the paths and
//! whatever the request payload names, does its file I/O, and returns —
//! nothing here survives to the next task.

mod handlers;
mod worker;

pub use handlers::{direct_index, pre_reverse, reverse_index, tokenize};
pub use worker::Worker;
