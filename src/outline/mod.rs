//! Outline assembly and caching.
//!
//! [`build_outline`] walks a document's top-level `options` symbol once and
//! assembles the flattened element lists plus the four categorical indexes.
//! [`OutlineStore`] owns the per-document [`Outline`] snapshots, rebuilds
//! them on demand (tolerating a slow external symbol source), and
//! broadcasts change events to subscribers.

mod builder;
mod elements;
mod store;

pub use builder::{LogicalValue, Outline, OutlineMap, build_outline};
pub use elements::{Category, CategoryElement, ElementKind};
pub use store::OutlineStore;
