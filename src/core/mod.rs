//! Shared utilities with no domain knowledge.

mod map_utils;

pub use map_utils::{append_to_map, sort_map_by_keys};
