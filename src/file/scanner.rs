//! Feature key offset scanning.
//!
//! Position lookups only ever need the byte offset of each feature's key
//! token under `options`. Those are recovered with a line scan anchored on
//! the feature-name line pattern, keeping the parsed document free of
//! source tokens.

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::TextSize;

use crate::flags::FEATURE_NAME_LINE;

/// Byte offset of every feature key line, keyed by feature name, in
/// document order. The offset points at the key token start (the opening
/// quote for quoted keys). Duplicate keys keep the first occurrence.
pub(crate) fn feature_key_offsets(text: &str) -> IndexMap<SmolStr, TextSize> {
    let mut offsets = IndexMap::new();
    let mut line_start = 0usize;
    for line in text.split_inclusive('\n') {
        if let Some((name, indent)) = key_name(line) {
            offsets
                .entry(name)
                .or_insert(TextSize::new((line_start + indent) as u32));
        }
        line_start += line.len();
    }
    offsets
}

/// The feature name on a key line (quotes and trailing colon stripped)
/// and the byte column of its key token.
fn key_name(line: &str) -> Option<(SmolStr, usize)> {
    let matched = FEATURE_NAME_LINE.find(line)?;
    let key = matched.as_str().trim_start();
    let indent = matched.len() - key.len();
    let key = key.strip_suffix(':').unwrap_or(key);
    let key = key.trim_matches('"');
    Some((SmolStr::new(key), indent))
}
