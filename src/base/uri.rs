//! Stable document identity.
//!
//! Outline caching is keyed by this value rather than by host object
//! identity, so eviction is explicit (`OutlineStore::forget_outline`)
//! instead of garbage-collection driven.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A canonical document identifier.
///
/// Cheap to clone and hash; two `DocumentUri`s are the same document
/// exactly when their string forms are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentUri(Arc<str>);

impl DocumentUri {
    /// Create a uri from its canonical string form.
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    /// Create a `file://` uri from a filesystem path.
    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()).into())
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The filesystem path for `file://` uris, or the raw string otherwise.
    pub fn fs_path(&self) -> &str {
        self.0.strip_prefix("file://").unwrap_or(&self.0)
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentUri {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}
