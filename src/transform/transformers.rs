//! Transformers from raw symbol subtrees to logical records.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::DocumentUri;
use crate::flags::{RolloutState, UNKNOWN_OWNER};
use crate::symbol::DocumentSymbol;

/// Knobs for the transformation.
#[derive(Clone, Copy, Debug)]
pub struct TransformOptions {
    /// Condition value lists longer than this are not materialized;
    /// they become [`LogicalConditionValue::Elided`]. Large value arrays
    /// are common and consumers only need the count to render them.
    pub max_inline_values: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            max_inline_values: 20,
        }
    }
}

/// A feature derived from one child of the `options` symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalFeature {
    /// The source node, kept for range queries by consumers.
    pub symbol: DocumentSymbol,
    pub uri: DocumentUri,
    pub name: SmolStr,
    pub created_at: SmolStr,
    pub enabled: bool,
    pub owner: SmolStr,
    pub segments: Vec<Arc<LogicalSegment>>,
    pub rollout_state: RolloutState,
    /// Warning: the feature is fully rolled out, yet the last segment in
    /// document order still carries conditions, so those segments are
    /// unreachable.
    pub has_extra_segments: bool,
}

/// A segment derived from one child of a feature's `segments` symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalSegment {
    pub symbol: DocumentSymbol,
    pub uri: DocumentUri,
    pub name: SmolStr,
    /// Percentage 0-100; defaults to 100 when unspecified.
    pub rollout: f64,
    pub conditions: Vec<Arc<LogicalCondition>>,
    pub rollout_state: RolloutState,
}

/// A condition derived from one child of a segment's `conditions` symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalCondition {
    pub symbol: DocumentSymbol,
    pub uri: DocumentUri,
    pub property: SmolStr,
    pub operator: SmolStr,
    pub value: LogicalConditionValue,
}

/// A condition value as resolved from the symbol tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogicalConditionValue {
    /// A single scalar, taken from the value node's detail.
    Scalar(SmolStr),
    /// A materialized list of scalars.
    List(Vec<SmolStr>),
    /// A list that was not materialized: either it exceeded
    /// [`TransformOptions::max_inline_values`], or the value node carried
    /// nothing resolvable (`total == 0`).
    Elided { total: usize },
}

/// Transform one feature symbol into a [`LogicalFeature`].
///
/// Missing optional fields never fail; they degrade to defaults:
/// `created_at` to empty, `enabled` to true, `owner` to
/// [`UNKNOWN_OWNER`], `segments` to none.
pub fn feature_from_symbol(
    uri: &DocumentUri,
    symbol: &DocumentSymbol,
    options: &TransformOptions,
) -> LogicalFeature {
    let created_at = symbol.child("created_at");
    let enabled = symbol.child("enabled");
    let owner = symbol.child("owner");
    let segments_symbol = symbol.child("segments");

    let segments: Vec<Arc<LogicalSegment>> = segments_symbol
        .map(|node| {
            node.children
                .iter()
                .map(|child| Arc::new(segment_from_symbol(uri, child, options)))
                .collect()
        })
        .unwrap_or_default();

    let rollout_state = reduce_feature_rollout(segments.iter().map(|s| s.rollout_state));

    let has_extra_segments = rollout_state == RolloutState::Full
        && segments
            .last()
            .is_some_and(|last| !last.conditions.is_empty());

    LogicalFeature {
        symbol: symbol.clone(),
        uri: uri.clone(),
        name: symbol.name.clone(),
        created_at: detail_or_empty(created_at),
        enabled: enabled.and_then(DocumentSymbol::detail_str) != Some("false"),
        owner: resolve_owner(owner),
        segments,
        rollout_state,
        has_extra_segments,
    }
}

/// Transform one segment symbol into a [`LogicalSegment`].
pub fn segment_from_symbol(
    uri: &DocumentUri,
    symbol: &DocumentSymbol,
    options: &TransformOptions,
) -> LogicalSegment {
    let name = symbol.child("name");
    let rollout = symbol.child("rollout");
    let conditions_symbol = symbol.child("conditions");

    let conditions: Vec<Arc<LogicalCondition>> = conditions_symbol
        .map(|node| {
            node.children
                .iter()
                .map(|child| Arc::new(condition_from_symbol(uri, child, options)))
                .collect()
        })
        .unwrap_or_default();

    let rollout_detail = rollout.and_then(DocumentSymbol::detail_str);
    let rollout_state = segment_rollout_state(rollout_detail, conditions.len());

    LogicalSegment {
        symbol: symbol.clone(),
        uri: uri.clone(),
        name: detail_or_empty(name),
        // default to 100 if omitted
        rollout: rollout_detail
            .and_then(|detail| detail.parse::<f64>().ok())
            .unwrap_or(100.0),
        conditions,
        rollout_state,
    }
}

/// Transform one condition symbol into a [`LogicalCondition`].
pub fn condition_from_symbol(
    uri: &DocumentUri,
    symbol: &DocumentSymbol,
    options: &TransformOptions,
) -> LogicalCondition {
    let operator = symbol.child("operator");
    let property = symbol.child("property");
    let value = symbol.child("value");

    LogicalCondition {
        symbol: symbol.clone(),
        uri: uri.clone(),
        operator: detail_or_empty(operator),
        property: detail_or_empty(property),
        value: resolve_value(value, options),
    }
}

/// Reduce segment states to a feature-level state, left to right.
///
/// Any `100%` segment anywhere makes the feature `100%`; absent that, any
/// `partial` segment makes it `partial`; zero segments (or only `0%`
/// segments) leave it at `0%`.
pub fn reduce_feature_rollout(states: impl IntoIterator<Item = RolloutState>) -> RolloutState {
    states
        .into_iter()
        .fold(RolloutState::Zero, |acc, state| match (acc, state) {
            (RolloutState::Full, _) | (_, RolloutState::Full) => RolloutState::Full,
            (_, RolloutState::Partial) => RolloutState::Partial,
            (acc, RolloutState::Zero) => acc,
        })
}

/// The segment-level rollout state, decided on the raw detail string.
///
/// Strictly ordered: `"0"` wins outright; an unset or `"100"` rollout is
/// `100%` only with zero conditions, because a condition still gates who
/// receives the rollout.
fn segment_rollout_state(rollout_detail: Option<&str>, condition_count: usize) -> RolloutState {
    if rollout_detail == Some("0") {
        return RolloutState::Zero;
    }
    // If `rollout` is not specified it's defaulted to 100
    if matches!(rollout_detail, None | Some("100")) && condition_count == 0 {
        return RolloutState::Full;
    }
    RolloutState::Partial
}

fn detail_or_empty(node: Option<&DocumentSymbol>) -> SmolStr {
    node.and_then(DocumentSymbol::detail_str)
        .map(SmolStr::new)
        .unwrap_or_default()
}

/// Owner resolution: a direct detail string wins; a structured owner node
/// falls back to its `email` detail, then `team` detail. Anything still
/// unresolved lands on [`UNKNOWN_OWNER`].
fn resolve_owner(owner: Option<&DocumentSymbol>) -> SmolStr {
    let resolved = owner.and_then(|node| {
        match node.detail_str() {
            Some(detail) if !detail.is_empty() => Some(detail),
            _ => ["email", "team"]
                .into_iter()
                .find_map(|key| node.child(key).and_then(DocumentSymbol::detail_str)),
        }
    });
    match resolved {
        Some(owner) if !owner.is_empty() => SmolStr::new(owner),
        _ => SmolStr::new_static(UNKNOWN_OWNER),
    }
}

fn resolve_value(
    value: Option<&DocumentSymbol>,
    options: &TransformOptions,
) -> LogicalConditionValue {
    let Some(node) = value else {
        return LogicalConditionValue::Elided { total: 0 };
    };
    if let Some(detail) = node.detail_str().filter(|detail| !detail.is_empty()) {
        return LogicalConditionValue::Scalar(SmolStr::new(detail));
    }
    let total = node.children.len();
    if total == 0 || total > options.max_inline_values {
        return LogicalConditionValue::Elided { total };
    }
    LogicalConditionValue::List(
        node.children
            .iter()
            .map(|child| {
                child
                    .detail_str()
                    .map(SmolStr::new)
                    .unwrap_or_else(|| child.name.clone())
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn uri() -> DocumentUri {
        DocumentUri::new("file:///flags.yaml")
    }

    fn condition_symbol(property: &str, operator: &str, value: &str) -> DocumentSymbol {
        DocumentSymbol::named("0").with_children(vec![
            DocumentSymbol::named("property").with_detail(property),
            DocumentSymbol::named("operator").with_detail(operator),
            DocumentSymbol::named("value").with_detail(value),
        ])
    }

    fn segment_symbol(name: &str, rollout: Option<&str>, conditions: Vec<DocumentSymbol>) -> DocumentSymbol {
        let mut children = vec![DocumentSymbol::named("name").with_detail(name)];
        if let Some(rollout) = rollout {
            children.push(DocumentSymbol::named("rollout").with_detail(rollout));
        }
        children.push(DocumentSymbol::named("conditions").with_children(conditions));
        DocumentSymbol::named("0").with_children(children)
    }

    fn feature_symbol(name: &str, segments: Vec<DocumentSymbol>) -> DocumentSymbol {
        DocumentSymbol::named(name).with_children(vec![
            DocumentSymbol::named("created_at").with_detail("2024-03-01"),
            DocumentSymbol::named("owner").with_detail("team-flags"),
            DocumentSymbol::named("segments").with_children(segments),
        ])
    }

    #[rstest]
    #[case(Some("0"), 0, RolloutState::Zero)]
    #[case(Some("0"), 3, RolloutState::Zero)]
    #[case(None, 0, RolloutState::Full)]
    #[case(Some("100"), 0, RolloutState::Full)]
    #[case(Some("100"), 1, RolloutState::Partial)]
    #[case(None, 1, RolloutState::Partial)]
    #[case(Some("25"), 0, RolloutState::Partial)]
    fn test_segment_rollout_state(
        #[case] detail: Option<&str>,
        #[case] conditions: usize,
        #[case] expected: RolloutState,
    ) {
        assert_eq!(segment_rollout_state(detail, conditions), expected);
    }

    #[test]
    fn test_reduce_any_full_wins() {
        let states = [RolloutState::Zero, RolloutState::Partial, RolloutState::Full];
        assert_eq!(reduce_feature_rollout(states), RolloutState::Full);
        let states = [RolloutState::Full, RolloutState::Partial];
        assert_eq!(reduce_feature_rollout(states), RolloutState::Full);
    }

    #[test]
    fn test_reduce_partial_beats_zero() {
        let states = [RolloutState::Zero, RolloutState::Partial, RolloutState::Zero];
        assert_eq!(reduce_feature_rollout(states), RolloutState::Partial);
    }

    #[test]
    fn test_reduce_empty_is_zero() {
        assert_eq!(reduce_feature_rollout([]), RolloutState::Zero);
    }

    #[test]
    fn test_feature_defaults_on_missing_fields() {
        let symbol = DocumentSymbol::named("feature.organizations:bare");
        let feature = feature_from_symbol(&uri(), &symbol, &TransformOptions::default());
        assert_eq!(feature.created_at, "");
        assert!(feature.enabled);
        assert_eq!(feature.owner, UNKNOWN_OWNER);
        assert!(feature.segments.is_empty());
        assert_eq!(feature.rollout_state, RolloutState::Zero);
        assert!(!feature.has_extra_segments);
    }

    #[test]
    fn test_enabled_only_literal_false_disables() {
        for (detail, expected) in [("false", false), ("true", true), ("False", true), ("no", true)] {
            let symbol = DocumentSymbol::named("feature.projects:x")
                .with_children(vec![DocumentSymbol::named("enabled").with_detail(detail)]);
            let feature = feature_from_symbol(&uri(), &symbol, &TransformOptions::default());
            assert_eq!(feature.enabled, expected, "detail {detail:?}");
        }
    }

    #[test]
    fn test_owner_structured_fallback() {
        let email_owner = DocumentSymbol::named("owner").with_children(vec![
            DocumentSymbol::named("email").with_detail("a@b.com"),
            DocumentSymbol::named("team").with_detail("team-x"),
        ]);
        let team_owner = DocumentSymbol::named("owner")
            .with_children(vec![DocumentSymbol::named("team").with_detail("team-x")]);
        let empty_owner = DocumentSymbol::named("owner");

        for (owner, expected) in [
            (email_owner, "a@b.com"),
            (team_owner, "team-x"),
            (empty_owner, UNKNOWN_OWNER),
        ] {
            let symbol = DocumentSymbol::named("feature.projects:x").with_children(vec![owner]);
            let feature = feature_from_symbol(&uri(), &symbol, &TransformOptions::default());
            assert_eq!(feature.owner, expected);
        }
    }

    #[test]
    fn test_extra_segments_requires_conditions_on_last_segment() {
        // Unconditional 100% first, conditioned segment after it: the
        // trailing segment can never matter.
        let symbol = feature_symbol(
            "feature.organizations:x",
            vec![
                segment_symbol("s2", Some("100"), vec![]),
                segment_symbol(
                    "s1",
                    Some("100"),
                    vec![condition_symbol("organization_slug", "equals", "acme")],
                ),
            ],
        );
        let feature = feature_from_symbol(&uri(), &symbol, &TransformOptions::default());
        assert_eq!(feature.rollout_state, RolloutState::Full);
        assert!(feature.has_extra_segments);

        // Same segments, reversed: the unconditional segment is last.
        let symbol = feature_symbol(
            "feature.organizations:x",
            vec![
                segment_symbol(
                    "s1",
                    Some("100"),
                    vec![condition_symbol("organization_slug", "equals", "acme")],
                ),
                segment_symbol("s2", Some("100"), vec![]),
            ],
        );
        let feature = feature_from_symbol(&uri(), &symbol, &TransformOptions::default());
        assert_eq!(feature.rollout_state, RolloutState::Full);
        assert!(!feature.has_extra_segments);
    }

    #[test]
    fn test_partial_feature_never_warns() {
        let symbol = feature_symbol(
            "feature.organizations:x",
            vec![segment_symbol(
                "s1",
                Some("100"),
                vec![condition_symbol("organization_slug", "equals", "acme")],
            )],
        );
        let feature = feature_from_symbol(&uri(), &symbol, &TransformOptions::default());
        assert_eq!(feature.rollout_state, RolloutState::Partial);
        assert!(!feature.has_extra_segments);
    }

    #[test]
    fn test_segment_rollout_number_defaults_to_100() {
        let segment = segment_from_symbol(
            &uri(),
            &segment_symbol("s", None, vec![]),
            &TransformOptions::default(),
        );
        assert_eq!(segment.rollout, 100.0);
        assert_eq!(segment.rollout_state, RolloutState::Full);
    }

    #[test]
    fn test_condition_value_scalar() {
        let condition = condition_from_symbol(
            &uri(),
            &condition_symbol("organization_slug", "equals", "acme"),
            &TransformOptions::default(),
        );
        assert_eq!(condition.property, "organization_slug");
        assert_eq!(condition.operator, "equals");
        assert_eq!(
            condition.value,
            LogicalConditionValue::Scalar(SmolStr::new("acme"))
        );
    }

    #[test]
    fn test_condition_value_list_materialized_under_threshold() {
        let value = DocumentSymbol::named("value").with_children(vec![
            DocumentSymbol::named("0").with_detail("alpha"),
            DocumentSymbol::named("1").with_detail("beta"),
        ]);
        let symbol = DocumentSymbol::named("0").with_children(vec![
            DocumentSymbol::named("property").with_detail("organization_slug"),
            DocumentSymbol::named("operator").with_detail("in"),
            value,
        ]);
        let condition = condition_from_symbol(&uri(), &symbol, &TransformOptions::default());
        assert_eq!(
            condition.value,
            LogicalConditionValue::List(vec![SmolStr::new("alpha"), SmolStr::new("beta")])
        );
    }

    #[test]
    fn test_condition_value_elided_over_threshold() {
        let children: Vec<DocumentSymbol> = (0..5)
            .map(|i| DocumentSymbol::named(format!("{i}")).with_detail(format!("v{i}")))
            .collect();
        let symbol = DocumentSymbol::named("0").with_children(vec![
            DocumentSymbol::named("property").with_detail("organization_id"),
            DocumentSymbol::named("operator").with_detail("in"),
            DocumentSymbol::named("value").with_children(children),
        ]);
        let options = TransformOptions {
            max_inline_values: 3,
        };
        let condition = condition_from_symbol(&uri(), &symbol, &options);
        assert_eq!(condition.value, LogicalConditionValue::Elided { total: 5 });
    }

    #[test]
    fn test_condition_value_missing_is_elided_zero() {
        let symbol = DocumentSymbol::named("0").with_children(vec![
            DocumentSymbol::named("property").with_detail("organization_id"),
            DocumentSymbol::named("operator").with_detail("in"),
        ]);
        let condition = condition_from_symbol(&uri(), &symbol, &TransformOptions::default());
        assert_eq!(condition.value, LogicalConditionValue::Elided { total: 0 });
    }
}
