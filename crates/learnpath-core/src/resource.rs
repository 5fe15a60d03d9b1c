//! Resource data model
//!
//! A [`Resource`] is the indexed unit: an educational item (course, video,
//! article) with its metadata payload. A [`Candidate`] is the per-query
//! projection of a resource plus a score, alive only for one request.

use serde::{Deserialize, Serialize};

/// Tenant id for content shared across all tenants
pub const GLOBAL_TENANT: &str = "global";

/// Difficulty levels (ordinal)
pub mod level {
    pub const BEGINNER: u8 = 0;
    pub const INTERMEDIATE: u8 = 1;
    pub const ADVANCED: u8 = 2;
}

/// Payload stored alongside each indexed vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Opaque resource identifier, immutable once written
    pub resource_id: String,
    pub title: String,
    /// Source URL; upserts are keyed by this, so re-ingestion is idempotent
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    /// 0=beginner, 1=intermediate, 2=advanced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Key of the cached content snippet in the blob store, if extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_key: Option<String>,
    /// Owning tenant; untagged resources belong to the shared partition
    #[serde(default = "default_tenant")]
    pub tenant_id: String,
}

fn default_tenant() -> String {
    GLOBAL_TENANT.to_string()
}

impl Resource {
    /// Create a resource with the required fields, owned by the global tenant
    pub fn new(
        resource_id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            title: title.into(),
            url: url.into(),
            provider: None,
            license: None,
            duration_min: None,
            level: None,
            skills: Vec::new(),
            media_type: None,
            description: None,
            snippet_key: None,
            tenant_id: default_tenant(),
        }
    }

    /// Text embedded for this resource (title plus description when present)
    pub fn embedding_text(&self) -> String {
        match &self.description {
            Some(desc) => format!("{} {}", self.title, desc),
            None => self.title.clone(),
        }
    }
}

/// Per-query search hit: a resource plus a score
///
/// The score starts as the raw vector similarity from the index and is
/// overwritten by the rerank relevance score when reranking runs. The two
/// are not comparable; downstream consumers only ever see one kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub resource: Resource,
    pub score: f64,
}

impl Candidate {
    pub fn new(resource: Resource, score: f64) -> Self {
        Self { resource, score }
    }

    /// Text the reranker scores against the query
    pub fn rerank_text(&self) -> String {
        self.resource.embedding_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_resource_defaults_to_global() {
        let json = r#"{"resource_id":"r1","title":"Intro","url":"https://example.com/intro"}"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.tenant_id, GLOBAL_TENANT);
        assert!(resource.skills.is_empty());
    }

    #[test]
    fn test_embedding_text_includes_description() {
        let mut resource = Resource::new("r1", "Rust Basics", "https://example.com/rust");
        assert_eq!(resource.embedding_text(), "Rust Basics");

        resource.description = Some("Ownership and borrowing".to_string());
        assert_eq!(
            resource.embedding_text(),
            "Rust Basics Ownership and borrowing"
        );
    }

    #[test]
    fn test_candidate_roundtrip_flattens_resource() {
        let candidate = Candidate::new(Resource::new("r1", "Title", "https://e.com"), 0.42);
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["resource_id"], "r1");
        assert_eq!(json["score"], 0.42);
    }
}
