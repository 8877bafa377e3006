//! The symbol provider contract consumed by the outline store.

use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::base::DocumentUri;

use super::DocumentSymbol;

/// Supplies symbol trees for documents.
///
/// Implementations may return `None` (or an incomplete tree) while the
/// backing indexer is still warming up; the outline store owns the retry
/// policy, not the source.
#[async_trait]
pub trait SymbolSource: Send + Sync {
    /// Query the current symbol tree for a document.
    async fn query_symbols(&self, uri: &DocumentUri) -> Option<Vec<DocumentSymbol>>;
}

/// An in-memory symbol source backed by a uri → tree map.
///
/// Useful in tests and for embedders that compute trees themselves.
#[derive(Default)]
pub struct StaticSymbolSource {
    trees: RwLock<FxHashMap<DocumentUri, Vec<DocumentSymbol>>>,
}

impl StaticSymbolSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the symbol tree for a document.
    pub fn insert(&self, uri: DocumentUri, symbols: Vec<DocumentSymbol>) {
        self.trees.write().insert(uri, symbols);
    }

    /// Remove a document's tree; later queries return `None`.
    pub fn remove(&self, uri: &DocumentUri) {
        self.trees.write().remove(uri);
    }
}

#[async_trait]
impl SymbolSource for StaticSymbolSource {
    async fn query_symbols(&self, uri: &DocumentUri) -> Option<Vec<DocumentSymbol>> {
        self.trees.read().get(uri).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_round_trip() {
        let source = StaticSymbolSource::new();
        let uri = DocumentUri::new("file:///tmp/flags.yaml");
        assert_eq!(source.query_symbols(&uri).await, None);

        source.insert(uri.clone(), vec![DocumentSymbol::named("options")]);
        let symbols = source.query_symbols(&uri).await.unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "options");

        source.remove(&uri);
        assert_eq!(source.query_symbols(&uri).await, None);
    }
}
