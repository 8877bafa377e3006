//! Category tree navigation over an outline.
//!
//! Tree surfaces show a document's features grouped by one category
//! dimension (document → value buckets → features). Both the dimension
//! and the element shape are closed variants with an explicit
//! discriminant, so navigation is exhaustive matching instead of runtime
//! shape probing.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::DocumentUri;
use crate::transform::LogicalFeature;

use super::builder::{LogicalValue, Outline, OutlineMap};

/// A category dimension features can be grouped by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Owner,
    Rollout,
    Enabled,
    CreatedAt,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Owner,
        Category::Rollout,
        Category::Enabled,
        Category::CreatedAt,
    ];

    /// The index for this dimension within a map.
    pub fn index<'a>(&self, map: &'a OutlineMap) -> &'a IndexMap<SmolStr, LogicalValue> {
        match self {
            Category::Owner => &map.all_owners,
            Category::Rollout => &map.all_rollouts,
            Category::Enabled => &map.all_enabled,
            Category::CreatedAt => &map.all_created_at,
        }
    }

    /// The bucket key a feature belongs to in this dimension.
    pub fn key_of(&self, feature: &LogicalFeature) -> SmolStr {
        match self {
            Category::Owner => feature.owner.clone(),
            Category::Rollout => SmolStr::new_static(feature.rollout_state.as_str()),
            Category::Enabled => {
                SmolStr::new_static(if feature.enabled { "true" } else { "false" })
            }
            Category::CreatedAt => feature.created_at.clone(),
        }
    }

    /// Buckets of this dimension, sorted by value for display.
    pub fn sorted_values<'a>(&self, map: &'a OutlineMap) -> Vec<&'a LogicalValue> {
        let mut values: Vec<&LogicalValue> = self.index(map).values().collect();
        values.sort_by(|a, b| a.value.cmp(&b.value));
        values
    }
}

/// What a [`CategoryElement`] points at.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    /// The document root.
    Uri,
    /// One category bucket, identified by its stringified value.
    Value(SmolStr),
    /// One feature within a bucket.
    Feature(Arc<LogicalFeature>),
}

/// One node of a by-category tree: a document, a bucket, or a feature,
/// always within one document and one category dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryElement {
    pub uri: DocumentUri,
    pub category: Category,
    pub kind: ElementKind,
}

impl CategoryElement {
    /// The root element for a document in one dimension.
    pub fn root(uri: DocumentUri, category: Category) -> Self {
        Self {
            uri,
            category,
            kind: ElementKind::Uri,
        }
    }

    /// Child elements, resolved against the document's outline.
    ///
    /// Documents whose outline has no map (not a Flagpole file) have no
    /// children.
    pub fn children(&self, outline: &Outline) -> Vec<CategoryElement> {
        let Some(map) = outline.map.as_ref() else {
            return Vec::new();
        };
        match &self.kind {
            ElementKind::Uri => self
                .category
                .sorted_values(map)
                .into_iter()
                .map(|bucket| CategoryElement {
                    uri: self.uri.clone(),
                    category: self.category,
                    kind: ElementKind::Value(bucket.value.clone()),
                })
                .collect(),
            ElementKind::Value(value) => map
                .all_features
                .iter()
                .filter(|feature| self.category.key_of(feature) == *value)
                .map(|feature| CategoryElement {
                    uri: self.uri.clone(),
                    category: self.category,
                    kind: ElementKind::Feature(Arc::clone(feature)),
                })
                .collect(),
            ElementKind::Feature(_) => Vec::new(),
        }
    }

    /// The parent element, if any.
    pub fn parent(&self) -> Option<CategoryElement> {
        let kind = match &self.kind {
            ElementKind::Uri => return None,
            ElementKind::Value(_) => ElementKind::Uri,
            ElementKind::Feature(feature) => ElementKind::Value(self.category.key_of(feature)),
        };
        Some(CategoryElement {
            uri: self.uri.clone(),
            category: self.category,
            kind,
        })
    }
}
