//! Editor selection tracking.
//!
//! One registry instance owns the current selections per document and is
//! injected into whichever components need read access; the host's
//! selection-change handler is the single writer.

use rustc_hash::FxHashMap;

use crate::base::{DocumentUri, Span};
use crate::transform::{LogicalCondition, LogicalFeature, LogicalSegment};

/// Anything with a source range that a selection can land on.
pub trait Selectable {
    fn span(&self) -> Span;
}

impl Selectable for LogicalFeature {
    fn span(&self) -> Span {
        self.symbol.range
    }
}

impl Selectable for LogicalSegment {
    fn span(&self) -> Span {
        self.symbol.range
    }
}

impl Selectable for LogicalCondition {
    fn span(&self) -> Span {
        self.symbol.range
    }
}

/// The current editor selections, per document.
#[derive(Default)]
pub struct SelectionRegistry {
    selections: FxHashMap<DocumentUri, Vec<Span>>,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selections for a document.
    pub fn set_selections(&mut self, uri: DocumentUri, selections: Vec<Span>) {
        self.selections.insert(uri, selections);
    }

    /// Drop a document's selections (e.g. its editor closed).
    pub fn clear(&mut self, uri: &DocumentUri) {
        self.selections.remove(uri);
    }

    pub fn selections(&self, uri: &DocumentUri) -> Option<&[Span]> {
        self.selections.get(uri).map(Vec::as_slice)
    }
}

/// Keep the elements whose range intersects any of the selections.
///
/// `None` selections (document never had a selection event) keep nothing.
pub fn filter_selected_elements<'a, T: Selectable>(
    selections: Option<&[Span]>,
    elements: impl IntoIterator<Item = &'a T>,
) -> Vec<&'a T> {
    let Some(selections) = selections else {
        return Vec::new();
    };
    elements
        .into_iter()
        .filter(|element| {
            let span = element.span();
            selections.iter().any(|selection| selection.intersects(&span))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::DocumentSymbol;
    use crate::transform::{TransformOptions, feature_from_symbol};

    fn feature_at(lines: (usize, usize)) -> LogicalFeature {
        let symbol = DocumentSymbol::new(
            "feature.projects:x",
            Span::from_coords(lines.0, 0, lines.1, 0),
            Span::from_coords(lines.0, 0, lines.0, 10),
        );
        feature_from_symbol(
            &DocumentUri::new("file:///flags.yaml"),
            &symbol,
            &TransformOptions::default(),
        )
    }

    #[test]
    fn test_registry_single_writer_round_trip() {
        let uri = DocumentUri::new("file:///flags.yaml");
        let mut registry = SelectionRegistry::new();
        assert!(registry.selections(&uri).is_none());

        registry.set_selections(uri.clone(), vec![Span::from_coords(0, 0, 0, 5)]);
        assert_eq!(registry.selections(&uri).unwrap().len(), 1);

        registry.clear(&uri);
        assert!(registry.selections(&uri).is_none());
    }

    #[test]
    fn test_filter_keeps_intersecting_elements() {
        let inside = feature_at((2, 4));
        let outside = feature_at((10, 12));
        let elements = [inside, outside];

        let selections = vec![Span::from_coords(3, 0, 3, 8)];
        let selected = filter_selected_elements(Some(&selections), elements.iter());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].symbol.range.start.line, 2);
    }

    #[test]
    fn test_no_selections_keeps_nothing() {
        let elements = [feature_at((0, 2))];
        assert!(filter_selected_elements(None, elements.iter()).is_empty());
    }
}
