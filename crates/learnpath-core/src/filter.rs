//! Query filter and predicate construction
//!
//! Translates the caller-facing [`QueryFilter`] into the index's predicate
//! algebra. Tenant isolation is not optional: when no filter or no tenant
//! is supplied the predicate restricts to the shared "global" partition,
//! and a concrete tenant only ever broadens that to "global OR tenant".

use crate::index::{Field, Predicate};
use crate::resource::GLOBAL_TENANT;
use serde::{Deserialize, Serialize};

/// Optional predicates narrowing a search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Tenant scope; absent means global-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Maximum difficulty level (0-2, inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Maximum duration in minutes (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_min: Option<u32>,
    /// Skill ids, accepted at the boundary but not yet a predicate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Build the index predicate for a search.
///
/// Never returns a match-everything predicate: the tenant clause is always
/// present.
pub fn build_predicate(filter: Option<&QueryFilter>) -> Predicate {
    let Some(filter) = filter else {
        return Predicate::All(vec![Predicate::Eq(
            Field::TenantId,
            GLOBAL_TENANT.to_string(),
        )]);
    };

    let mut conditions = Vec::new();

    // Tenant clause: global-only, or (global OR tenant) for a real tenant
    match filter.tenant_id.as_deref() {
        None | Some(GLOBAL_TENANT) => {
            conditions.push(Predicate::Eq(Field::TenantId, GLOBAL_TENANT.to_string()));
        }
        Some(tenant) => {
            conditions.push(Predicate::Any(vec![
                Predicate::Eq(Field::TenantId, GLOBAL_TENANT.to_string()),
                Predicate::Eq(Field::TenantId, tenant.to_string()),
            ]));
        }
    }

    if let Some(level) = filter.level {
        conditions.push(Predicate::Lte(Field::Level, i64::from(level)));
    }

    if let Some(max_duration) = filter.max_duration_min {
        conditions.push(Predicate::Lte(Field::DurationMin, i64::from(max_duration)));
    }

    if let Some(ref media_type) = filter.media_type {
        conditions.push(Predicate::Eq(Field::MediaType, media_type.clone()));
    }

    if let Some(ref provider) = filter.provider {
        conditions.push(Predicate::Eq(Field::Provider, provider.clone()));
    }

    Predicate::All(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter_restricts_to_global() {
        let pred = build_predicate(None);
        assert_eq!(
            pred,
            Predicate::All(vec![Predicate::Eq(Field::TenantId, "global".to_string())])
        );
    }

    #[test]
    fn test_global_tenant_same_as_no_filter() {
        let filter = QueryFilter {
            tenant_id: Some("global".to_string()),
            ..Default::default()
        };
        assert_eq!(build_predicate(Some(&filter)), build_predicate(None));
    }

    #[test]
    fn test_tenant_broadens_to_global_or_tenant() {
        let filter = QueryFilter {
            tenant_id: Some("acme".to_string()),
            ..Default::default()
        };
        let pred = build_predicate(Some(&filter));

        let Predicate::All(conditions) = pred else {
            panic!("expected conjunction");
        };
        assert_eq!(conditions.len(), 1);
        assert_eq!(
            conditions[0],
            Predicate::Any(vec![
                Predicate::Eq(Field::TenantId, "global".to_string()),
                Predicate::Eq(Field::TenantId, "acme".to_string()),
            ])
        );
    }

    #[test]
    fn test_optional_predicates_included_only_when_present() {
        let filter = QueryFilter {
            level: Some(1),
            max_duration_min: Some(90),
            media_type: Some("video".to_string()),
            ..Default::default()
        };
        let Predicate::All(conditions) = build_predicate(Some(&filter)) else {
            panic!("expected conjunction");
        };
        // tenant + level + duration + media_type, no provider
        assert_eq!(conditions.len(), 4);
        assert!(conditions.contains(&Predicate::Lte(Field::Level, 1)));
        assert!(conditions.contains(&Predicate::Lte(Field::DurationMin, 90)));
        assert!(conditions.contains(&Predicate::Eq(Field::MediaType, "video".to_string())));
    }
}
