//! The per-document outline cache.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::broadcast;

use crate::base::DocumentUri;
use crate::symbol::{DocumentSymbol, SymbolSource};
use crate::transform::TransformOptions;

use super::builder::{Outline, build_outline};

/// Wall-clock budget for waiting on a symbol source that has not finished
/// indexing the document yet. Past this, the document is treated as
/// having no outline.
const SOURCE_RETRY_CAP: Duration = Duration::from_secs(5);

/// Delay added before each further poll of the symbol source.
const SOURCE_RETRY_STEP: Duration = Duration::from_secs(1);

/// Owns the association between documents and their most recently built
/// [`Outline`], and notifies subscribers when a document's outline is
/// replaced.
///
/// The store is the sole mutator of its maps; the `Arc<Outline>` values it
/// hands out are immutable snapshots. Rebuilds for the same document are
/// serialized, so a stale rebuild can never publish after a newer one.
pub struct OutlineStore {
    source: Arc<dyn SymbolSource>,
    options: TransformOptions,
    /// Cache + identity tracking in one map: a document is "known" exactly
    /// while it has a cached outline. Keyed by the canonical uri, evicted
    /// explicitly via [`forget_outline`](Self::forget_outline).
    cache: Mutex<IndexMap<DocumentUri, Arc<Outline>>>,
    /// Per-document rebuild locks for `fire` serialization.
    rebuilds: Mutex<FxHashMap<DocumentUri, Arc<tokio::sync::Mutex<()>>>>,
    events: broadcast::Sender<Arc<Outline>>,
}

impl OutlineStore {
    pub fn new(source: Arc<dyn SymbolSource>) -> Self {
        Self::with_options(source, TransformOptions::default())
    }

    pub fn with_options(source: Arc<dyn SymbolSource>, options: TransformOptions) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            source,
            options,
            cache: Mutex::new(IndexMap::new()),
            rebuilds: Mutex::new(FxHashMap::default()),
            events,
        }
    }

    /// Subscribe to outline change events. One event is delivered per
    /// successful `fire` rebuild.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Outline>> {
        self.events.subscribe()
    }

    /// All documents currently tracked (ever successfully cached and not
    /// since forgotten), in first-seen order.
    pub fn known_uris(&self) -> Vec<DocumentUri> {
        self.cache.lock().keys().cloned().collect()
    }

    /// Get the outline for a document.
    ///
    /// A cache hit returns immediately. On a miss the symbol source is
    /// polled with increasing delays until it produces a tree or the
    /// retry budget runs out; `None` means "no flags found", not an
    /// error, and is not cached.
    pub async fn get_outline(&self, uri: &DocumentUri) -> Option<Arc<Outline>> {
        if let Some(outline) = self.cache.lock().get(uri) {
            return Some(Arc::clone(outline));
        }

        let symbols = self.query_symbols_with_backoff(uri).await?;
        let map = build_outline(uri, &symbols, &self.options);
        let outline = Arc::new(Outline {
            uri: uri.clone(),
            symbols,
            map,
        });

        tracing::debug!("cached outline for {uri}");
        self.cache
            .lock()
            .insert(uri.clone(), Arc::clone(&outline));
        Some(outline)
    }

    /// Invalidate and rebuild a document's outline, then broadcast the
    /// fresh snapshot.
    ///
    /// If the rebuild yields nothing (document transiently unparsable or
    /// source gone quiet), no event fires and subscribers keep whatever
    /// they last saw. Overlapping `fire` calls for one document are
    /// coalesced behind a per-document lock.
    pub async fn fire(&self, uri: &DocumentUri) {
        let rebuild_lock = {
            let mut rebuilds = self.rebuilds.lock();
            Arc::clone(rebuilds.entry(uri.clone()).or_default())
        };
        let _serialized = rebuild_lock.lock().await;

        self.forget_outline(uri);
        if let Some(outline) = self.get_outline(uri).await {
            tracing::debug!("outline changed for {uri}");
            // Nobody listening is fine.
            let _ = self.events.send(outline);
        }
    }

    /// Drop a document's cache entry and identity registration without
    /// rebuilding or firing.
    pub fn forget_outline(&self, uri: &DocumentUri) {
        if self.cache.lock().shift_remove(uri).is_some() {
            tracing::debug!("forgot outline for {uri}");
        }
    }

    /// Release per-document bookkeeping for a closed document.
    pub fn release(&self, uri: &DocumentUri) {
        self.forget_outline(uri);
        self.rebuilds.lock().remove(uri);
    }

    /// Poll the source until it yields symbols, with delays of 0s, 1s,
    /// 2s, … between polls, giving up once the next delay would exceed
    /// [`SOURCE_RETRY_CAP`].
    async fn query_symbols_with_backoff(&self, uri: &DocumentUri) -> Option<Vec<DocumentSymbol>> {
        let mut delay = Duration::ZERO;
        loop {
            if delay > SOURCE_RETRY_CAP {
                tracing::debug!("symbol source never produced a tree for {uri}");
                return None;
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Some(symbols) = self.source.query_symbols(uri).await {
                return Some(symbols);
            }
            delay += SOURCE_RETRY_STEP;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::StaticSymbolSource;

    fn uri(s: &str) -> DocumentUri {
        DocumentUri::new(s)
    }

    fn flagpole_symbols() -> Vec<DocumentSymbol> {
        vec![DocumentSymbol::named("options").with_children(vec![
            DocumentSymbol::named("feature.organizations:a").with_children(vec![
                DocumentSymbol::named("owner").with_detail("a@b.com"),
            ]),
        ])]
    }

    #[tokio::test]
    async fn test_cache_hit_returns_same_snapshot() {
        let source = Arc::new(StaticSymbolSource::new());
        source.insert(uri("file:///a.yaml"), flagpole_symbols());
        let store = OutlineStore::new(source);

        let first = store.get_outline(&uri("file:///a.yaml")).await.unwrap();
        let second = store.get_outline(&uri("file:///a.yaml")).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.known_uris(), vec![uri("file:///a.yaml")]);
    }

    #[tokio::test]
    async fn test_non_flagpole_symbols_cache_with_empty_map() {
        let source = Arc::new(StaticSymbolSource::new());
        source.insert(uri("file:///other.yaml"), vec![DocumentSymbol::named("services")]);
        let store = OutlineStore::new(source);

        let outline = store.get_outline(&uri("file:///other.yaml")).await.unwrap();
        assert!(outline.map.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_source_exhausts_retry_budget() {
        let source = Arc::new(StaticSymbolSource::new());
        let store = OutlineStore::new(source);

        let outline = store.get_outline(&uri("file:///absent.yaml")).await;
        assert!(outline.is_none());
        assert!(store.known_uris().is_empty());
    }

    #[tokio::test]
    async fn test_forget_then_get_rebuilds() {
        let source = Arc::new(StaticSymbolSource::new());
        source.insert(uri("file:///a.yaml"), flagpole_symbols());
        let store = OutlineStore::new(Arc::clone(&source) as Arc<dyn SymbolSource>);

        let first = store.get_outline(&uri("file:///a.yaml")).await.unwrap();
        store.forget_outline(&uri("file:///a.yaml"));
        assert!(store.known_uris().is_empty());

        let second = store.get_outline(&uri("file:///a.yaml")).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fire_broadcasts_fresh_outline() {
        let source = Arc::new(StaticSymbolSource::new());
        source.insert(uri("file:///a.yaml"), flagpole_symbols());
        let store = OutlineStore::new(Arc::clone(&source) as Arc<dyn SymbolSource>);
        let mut events = store.subscribe();

        store.fire(&uri("file:///a.yaml")).await;
        let outline = events.try_recv().unwrap();
        assert_eq!(outline.uri, uri("file:///a.yaml"));
        assert_eq!(outline.map.as_ref().unwrap().all_features.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_without_symbols_stays_silent() {
        let source = Arc::new(StaticSymbolSource::new());
        let store = OutlineStore::new(source);
        let mut events = store.subscribe();

        store.fire(&uri("file:///absent.yaml")).await;
        assert!(events.try_recv().is_err());
    }
}
