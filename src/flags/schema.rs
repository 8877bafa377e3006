//! serde schema for raw Flagpole YAML documents.
//!
//! The schema is deliberately lenient about optional fields: absent
//! `created_at`/`enabled`/`owner`/`segments` degrade to documented
//! defaults instead of failing the parse.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::types::{Operator, RolloutState, UNKNOWN_OWNER};

/// A whole Flagpole document: a top-level `options` mapping from feature
/// name to definition, in document order.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FlagpoleDoc {
    pub options: IndexMap<String, FeatureDef>,
}

/// One feature definition as authored.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct FeatureDef {
    #[serde(default)]
    pub created_at: String,
    /// `None` means "not specified", which evaluates as enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub segments: Vec<SegmentDef>,
}

impl FeatureDef {
    /// Enabled unless explicitly set to `false`.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// The owner label used for grouping; unspecified or empty owners
    /// land in the [`UNKNOWN_OWNER`] bucket.
    pub fn owner_label(&self) -> &str {
        match self.owner.as_deref() {
            Some(owner) if !owner.is_empty() => owner,
            _ => UNKNOWN_OWNER,
        }
    }
}

/// One segment definition as authored.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SegmentDef {
    #[serde(default)]
    pub name: String,
    /// Percentage 0-100; `None` means "not specified" and evaluates as 100.
    #[serde(default)]
    pub rollout: Option<f64>,
    #[serde(default)]
    pub conditions: Vec<ConditionDef>,
}

impl SegmentDef {
    /// Rollout state of this segment alone.
    ///
    /// `rollout: 0` is always `0%` regardless of conditions; an unset or
    /// 100 rollout is only `100%` when nothing gates it.
    pub fn rollout_state(&self) -> RolloutState {
        if self.rollout == Some(0.0) {
            return RolloutState::Zero;
        }
        // If `rollout` is not specified it's defaulted to 100
        if matches!(self.rollout, None | Some(100.0)) && self.conditions.is_empty() {
            return RolloutState::Full;
        }
        RolloutState::Partial
    }

    /// A stable serialization of the segment *definition* (name plus
    /// conditions, excluding the rollout percentage). Two segments with
    /// the same fingerprint differ at most in how far they are rolled out.
    pub fn fingerprint(&self) -> String {
        #[derive(Serialize, Debug)]
        struct SegmentShape<'a> {
            name: &'a str,
            conditions: &'a [ConditionDef],
        }
        let shape = SegmentShape {
            name: &self.name,
            conditions: &self.conditions,
        };
        // Non-finite numbers are not representable in JSON; the debug form
        // is still a stable key for them.
        serde_json::to_string(&shape).unwrap_or_else(|_| format!("{shape:?}"))
    }
}

/// One condition predicate as authored.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ConditionDef {
    pub property: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Option<ConditionValue>,
}

/// A condition value: one scalar or a list of scalars.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ConditionValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// A YAML scalar as it appears in condition values.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    String(String),
}

/// A feature with its derived rollout state, as exposed by the file
/// indexes.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub name: SmolStr,
    pub definition: FeatureDef,
    pub rollout: RolloutState,
}
