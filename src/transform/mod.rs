//! Symbol subtree → typed logical record transformation.
//!
//! Pure functions, no side effects, no caching: one raw symbol subtree in,
//! one [`LogicalFeature`]/[`LogicalSegment`]/[`LogicalCondition`] out, with
//! all derived fields (rollout states, enabled flag, owner, extra-segment
//! warning) computed on the way.

mod transformers;

pub use transformers::{
    LogicalCondition, LogicalConditionValue, LogicalFeature, LogicalSegment, TransformOptions,
    condition_from_symbol, feature_from_symbol, reduce_feature_rollout, segment_from_symbol,
};
