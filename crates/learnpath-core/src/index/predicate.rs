//! Predicate algebra for filtered index queries
//!
//! A [`Predicate`] is the index's native filter language: a small tree of
//! conjunctions, disjunctions, and field comparisons evaluated against the
//! payload of each stored point. Callers build predicates through the
//! filter builder and pass them opaquely to the index.

use crate::resource::Resource;

/// Filter condition evaluated against a point's payload
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// All sub-predicates must match (AND)
    All(Vec<Predicate>),
    /// At least one sub-predicate must match (OR)
    Any(Vec<Predicate>),
    /// String field equals value
    Eq(Field, String),
    /// Numeric field is less than or equal to value
    Lte(Field, i64),
}

/// Payload fields addressable by predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TenantId,
    Level,
    DurationMin,
    MediaType,
    Provider,
}

impl Predicate {
    /// Evaluate this predicate against a resource payload.
    ///
    /// A comparison against an absent optional field does not match, so a
    /// duration cap never surfaces resources with unknown duration.
    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            Predicate::All(preds) => preds.iter().all(|p| p.matches(resource)),
            Predicate::Any(preds) => preds.iter().any(|p| p.matches(resource)),
            Predicate::Eq(field, value) => match field {
                Field::TenantId => resource.tenant_id == *value,
                Field::MediaType => resource.media_type.as_deref() == Some(value.as_str()),
                Field::Provider => resource.provider.as_deref() == Some(value.as_str()),
                Field::Level | Field::DurationMin => false,
            },
            Predicate::Lte(field, value) => match field {
                Field::Level => resource.level.map(|l| i64::from(l) <= *value).unwrap_or(false),
                Field::DurationMin => resource
                    .duration_min
                    .map(|d| i64::from(d) <= *value)
                    .unwrap_or(false),
                Field::TenantId | Field::MediaType | Field::Provider => false,
            },
        }
    }
}
