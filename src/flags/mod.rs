//! The Flagpole domain model.
//!
//! Closed enumerations for the parts of the format with a fixed domain
//! (rollout states, operators, condition properties), the feature-name
//! patterns, and the serde schema for raw Flagpole YAML documents.

mod schema;
mod types;

pub use schema::{ConditionDef, ConditionValue, Feature, FeatureDef, FlagpoleDoc, Scalar, SegmentDef};
pub use types::{
    FEATURE_NAME_LINE, FEATURE_NAME_PATTERN, Operator, Property, RolloutState, UNKNOWN_OWNER,
    ValueKind, is_valid_feature_name, rollout_emoji,
};
