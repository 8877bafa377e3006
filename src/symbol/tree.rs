//! Hierarchical symbol tree nodes.

use smol_str::SmolStr;

use crate::base::Span;

/// One node of a document symbol tree: a named region with an optional
/// detail string and child nodes.
///
/// For Flagpole YAML this is the shape a language service reports: mapping
/// keys become names, scalar values become details, nested structures
/// become children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSymbol {
    pub name: SmolStr,
    pub detail: Option<SmolStr>,
    /// The full extent of the node, including children.
    pub range: Span,
    /// The extent of just the node's own name.
    pub selection_range: Span,
    pub children: Vec<DocumentSymbol>,
}

impl DocumentSymbol {
    pub fn new(name: impl Into<SmolStr>, range: Span, selection_range: Span) -> Self {
        Self {
            name: name.into(),
            detail: None,
            range,
            selection_range,
            children: Vec::new(),
        }
    }

    /// A node with empty ranges, for synthesized trees.
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self::new(name, Span::empty(), Span::empty())
    }

    pub fn with_detail(mut self, detail: impl Into<SmolStr>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_children(mut self, children: Vec<DocumentSymbol>) -> Self {
        self.children = children;
        self
    }

    /// Find the first direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&DocumentSymbol> {
        self.children.iter().find(|child| child.name == name)
    }

    /// The detail string, if any.
    pub fn detail_str(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}
