//! Foundation types for the Flagpole toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`DocumentUri`] - Stable document identifiers
//! - [`Position`], [`Span`] - Line/column positions for symbol nodes
//! - [`LineIndex`] - Byte offset to line/column conversion
//!
//! This module has NO dependencies on other flagpole modules.

mod line_index;
mod position;
mod uri;

pub use line_index::LineIndex;
pub use position::{Position, Span};
pub use uri::DocumentUri;

// Re-export text-size types for convenience
pub use text_size::TextSize;
