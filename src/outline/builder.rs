//! Single-pass outline assembly.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{DocumentUri, Span};
use crate::symbol::DocumentSymbol;
use crate::transform::{
    LogicalCondition, LogicalFeature, LogicalSegment, TransformOptions, feature_from_symbol,
};

/// A grouping bucket: one category value and the features sharing it.
///
/// Built fresh on every outline build; buckets accumulate and are never
/// deduplicated, so a bucket's length is the feature count for its value.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalValue {
    pub uri: DocumentUri,
    pub value: SmolStr,
    pub features: Vec<Arc<LogicalFeature>>,
}

impl LogicalValue {
    fn new(uri: &DocumentUri, value: SmolStr) -> Self {
        Self {
            uri: uri.clone(),
            value,
            features: Vec::new(),
        }
    }
}

/// The derived, indexed logical model for one document.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct OutlineMap {
    /// Range of the `options` symbol.
    pub range: Span,
    pub selection_range: Span,
    /// Flattened element lists, insertion order = document order.
    pub all_features: Vec<Arc<LogicalFeature>>,
    pub all_segments: Vec<Arc<LogicalSegment>>,
    pub all_conditions: Vec<Arc<LogicalCondition>>,
    /// Categorical indexes, keyed by the stringified category value.
    pub all_owners: IndexMap<SmolStr, LogicalValue>,
    pub all_rollouts: IndexMap<SmolStr, LogicalValue>,
    pub all_enabled: IndexMap<SmolStr, LogicalValue>,
    pub all_created_at: IndexMap<SmolStr, LogicalValue>,
}

/// A per-document snapshot: the raw symbol tree plus the derived map.
///
/// `map` is `None` when the document's symbols do not look like a Flagpole
/// file (no top-level `options`): "nothing to show", not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    pub uri: DocumentUri,
    pub symbols: Vec<DocumentSymbol>,
    pub map: Option<OutlineMap>,
}

/// Build the derived map for one document version.
///
/// Returns `None` if no top-level symbol is named `options`. The design
/// assumes one fresh call per document version: buckets accumulate and
/// would double-count if fed the same in-memory structures twice.
pub fn build_outline(
    uri: &DocumentUri,
    symbols: &[DocumentSymbol],
    options: &TransformOptions,
) -> Option<OutlineMap> {
    let options_symbol = symbols.iter().find(|symbol| symbol.name == "options")?;

    let mut map = OutlineMap {
        range: options_symbol.range,
        selection_range: options_symbol.selection_range,
        ..OutlineMap::default()
    };

    for symbol in &options_symbol.children {
        let feature = Arc::new(feature_from_symbol(uri, symbol, options));

        append_bucket(&mut map.all_owners, uri, feature.owner.clone(), &feature);
        append_bucket(
            &mut map.all_rollouts,
            uri,
            SmolStr::new_static(feature.rollout_state.as_str()),
            &feature,
        );
        // String-coerced booleans so the enabled index is handled like
        // every other category map.
        append_bucket(
            &mut map.all_enabled,
            uri,
            SmolStr::new_static(if feature.enabled { "true" } else { "false" }),
            &feature,
        );
        append_bucket(
            &mut map.all_created_at,
            uri,
            feature.created_at.clone(),
            &feature,
        );

        for segment in &feature.segments {
            map.all_segments.push(Arc::clone(segment));
            for condition in &segment.conditions {
                map.all_conditions.push(Arc::clone(condition));
            }
        }

        map.all_features.push(feature);
    }

    Some(map)
}

fn append_bucket(
    index: &mut IndexMap<SmolStr, LogicalValue>,
    uri: &DocumentUri,
    key: SmolStr,
    feature: &Arc<LogicalFeature>,
) {
    index
        .entry(key.clone())
        .or_insert_with(|| LogicalValue::new(uri, key))
        .features
        .push(Arc::clone(feature));
}
