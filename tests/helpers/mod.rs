//! Shared builders for symbol-tree fixtures.

use flagpole::symbol::DocumentSymbol;

/// A top-level tree with one `options` node holding the given features.
pub fn options_root(features: Vec<DocumentSymbol>) -> Vec<DocumentSymbol> {
    vec![DocumentSymbol::named("options").with_children(features)]
}

/// A feature node with an owner and a `segments` list.
pub fn feature_with_segments(
    name: &str,
    owner: &str,
    segments: Vec<DocumentSymbol>,
) -> DocumentSymbol {
    DocumentSymbol::named(name).with_children(vec![
        DocumentSymbol::named("created_at").with_detail("2024-01-01"),
        DocumentSymbol::named("owner").with_detail(owner),
        DocumentSymbol::named("segments").with_children(segments),
    ])
}

/// A segment node; `rollout: None` leaves the field unspecified.
pub fn segment(
    name: &str,
    rollout: Option<&str>,
    conditions: Vec<DocumentSymbol>,
) -> DocumentSymbol {
    let mut children = vec![DocumentSymbol::named("name").with_detail(name)];
    if let Some(rollout) = rollout {
        children.push(DocumentSymbol::named("rollout").with_detail(rollout));
    }
    children.push(DocumentSymbol::named("conditions").with_children(conditions));
    DocumentSymbol::named("0").with_children(children)
}

/// A condition node with a scalar value.
pub fn condition(property: &str, operator: &str, value: &str) -> DocumentSymbol {
    DocumentSymbol::named("0").with_children(vec![
        DocumentSymbol::named("property").with_detail(property),
        DocumentSymbol::named("operator").with_detail(operator),
        DocumentSymbol::named("value").with_detail(value),
    ])
}
