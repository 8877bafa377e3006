//! Closed enumerations and naming rules for the Flagpole format.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bucket key used when a feature does not declare an owner.
///
/// Policy constant: both the symbol-tree and raw-text paths group
/// ownerless features under this value so the by-owner index is
/// consistent across variants.
pub const UNKNOWN_OWNER: &str = "unknown";

/// A full feature name: `feature.(organizations|projects):<slug>`.
pub static FEATURE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^feature\.(?:organizations|projects):[a-z0-9-_.]+$").unwrap());

/// A source line introducing a feature entry, optionally quoted.
pub static FEATURE_NAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*"?feature\.(?:organizations|projects):[\w\-.]+"?:"#).unwrap());

/// Check a candidate feature name against the naming rule.
pub fn is_valid_feature_name(name: &str) -> bool {
    FEATURE_NAME_PATTERN.is_match(name)
}

// ============================================================================
// ROLLOUT STATE
// ============================================================================

/// How much of a segment or feature is rolled out.
///
/// The domain is closed and exhaustively produced by the transformer, so
/// every consumption site matches all three states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RolloutState {
    /// Rollout is off (`0%`).
    Zero,
    /// Conditionally gated.
    Partial,
    /// Unconditionally on (`100%`).
    Full,
}

impl RolloutState {
    /// All states, in display order.
    pub const ALL: [RolloutState; 3] = [RolloutState::Zero, RolloutState::Partial, RolloutState::Full];

    /// The display string, also used as a category index key.
    pub fn as_str(&self) -> &'static str {
        match self {
            RolloutState::Zero => "0%",
            RolloutState::Partial => "partial",
            RolloutState::Full => "100%",
        }
    }
}

impl fmt::Display for RolloutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emoji marker for inline rollout annotations.
pub fn rollout_emoji(state: RolloutState) -> &'static str {
    match state {
        RolloutState::Zero => "⭕",
        RolloutState::Partial => "🟠",
        RolloutState::Full => "🟢",
    }
}

// ============================================================================
// OPERATORS
// ============================================================================

/// A condition operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    In,
    NotIn,
    Contains,
    NotContains,
    Equals,
    NotEquals,
}

impl Operator {
    /// All operators, in the order completion surfaces list them.
    pub const ALL: [Operator; 6] = [
        Operator::In,
        Operator::NotIn,
        Operator::Contains,
        Operator::NotContains,
        Operator::Equals,
        Operator::NotEquals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
        }
    }

    /// Parse an operator name as written in a document.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.as_str() == name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

/// The scalar type a condition property is evaluated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
}

/// A condition property from the fixed Flagpole property set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    OrganizationId,
    OrganizationIsEarlyAdopter,
    OrganizationName,
    OrganizationSlug,
    ProjectId,
    ProjectName,
    ProjectPlatform,
    ProjectSlug,
    SentryRegion,
    SentrySingletenant,
    SubscriptionIsFree,
    SubscriptionIsPartner,
    SubscriptionMissing,
    SubscriptionPlanFamily,
    SubscriptionPlanTier,
    SubscriptionPlanTrialPlanFamily,
    SubscriptionPlanTrialPlanTier,
    SubscriptionPlanTrialPlan,
    SubscriptionPlan,
    UserDomain,
    UserEmail,
    UserId,
    UserIsStaff,
    UserIsSuperuser,
}

impl Property {
    /// All properties, in the order completion surfaces list them.
    pub const ALL: [Property; 24] = [
        Property::OrganizationId,
        Property::OrganizationIsEarlyAdopter,
        Property::OrganizationName,
        Property::OrganizationSlug,
        Property::ProjectId,
        Property::ProjectName,
        Property::ProjectPlatform,
        Property::ProjectSlug,
        Property::SentryRegion,
        Property::SentrySingletenant,
        Property::SubscriptionIsFree,
        Property::SubscriptionIsPartner,
        Property::SubscriptionMissing,
        Property::SubscriptionPlanFamily,
        Property::SubscriptionPlanTier,
        Property::SubscriptionPlanTrialPlanFamily,
        Property::SubscriptionPlanTrialPlanTier,
        Property::SubscriptionPlanTrialPlan,
        Property::SubscriptionPlan,
        Property::UserDomain,
        Property::UserEmail,
        Property::UserId,
        Property::UserIsStaff,
        Property::UserIsSuperuser,
    ];

    /// The property name as written in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::OrganizationId => "organization_id",
            Property::OrganizationIsEarlyAdopter => "organization_is-early-adopter",
            Property::OrganizationName => "organization_name",
            Property::OrganizationSlug => "organization_slug",
            Property::ProjectId => "project_id",
            Property::ProjectName => "project_name",
            Property::ProjectPlatform => "project_platform",
            Property::ProjectSlug => "project_slug",
            Property::SentryRegion => "sentry_region",
            Property::SentrySingletenant => "sentry_singletenant",
            Property::SubscriptionIsFree => "subscription_is-free",
            Property::SubscriptionIsPartner => "subscription_is-partner",
            Property::SubscriptionMissing => "subscription_missing",
            Property::SubscriptionPlanFamily => "subscription_plan-family",
            Property::SubscriptionPlanTier => "subscription_plan-tier",
            Property::SubscriptionPlanTrialPlanFamily => "subscription_plan-trial-plan-family",
            Property::SubscriptionPlanTrialPlanTier => "subscription_plan-trial-plan-tier",
            Property::SubscriptionPlanTrialPlan => "subscription_plan-trial-plan",
            Property::SubscriptionPlan => "subscription_plan",
            Property::UserDomain => "user_domain",
            Property::UserEmail => "user_email",
            Property::UserId => "user_id",
            Property::UserIsStaff => "user_is-staff",
            Property::UserIsSuperuser => "user_is-superuser",
        }
    }

    /// The declared type of this property's values.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Property::OrganizationId | Property::ProjectId | Property::UserId => ValueKind::Number,
            Property::OrganizationIsEarlyAdopter
            | Property::SentrySingletenant
            | Property::SubscriptionIsFree
            | Property::SubscriptionIsPartner
            | Property::SubscriptionMissing
            | Property::UserIsStaff
            | Property::UserIsSuperuser => ValueKind::Boolean,
            _ => ValueKind::String,
        }
    }

    /// Parse a property name as written in a document.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
