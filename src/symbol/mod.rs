//! The document model source seam.
//!
//! The outline engine does not parse documents on this path; it consumes
//! hierarchical symbol trees supplied by an external language service via
//! the [`SymbolSource`] trait. [`StaticSymbolSource`] is an in-memory
//! implementation for tests and embedders that already hold trees.

mod source;
mod tree;

pub use source::{StaticSymbolSource, SymbolSource};
pub use tree::DocumentSymbol;
