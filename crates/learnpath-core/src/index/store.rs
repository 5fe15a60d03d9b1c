//! Index schema and point storage

use super::Predicate;
use crate::error::{LearnPathError, Result};
use crate::resource::{Candidate, Resource};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;

const CREATE_TABLES: &str = r#"
-- Indexed points: one row per resource, upserts keyed by URL
CREATE TABLE IF NOT EXISTS points (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    resource_id TEXT NOT NULL,
    url TEXT NOT NULL,
    embedding BLOB NOT NULL,
    payload TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(url)
);

CREATE INDEX IF NOT EXISTS idx_points_resource_id ON points(resource_id);

-- Model metadata for dimension validation
CREATE TABLE IF NOT EXISTS model_metadata (
    model TEXT PRIMARY KEY,
    dimensions INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    last_used_at TEXT NOT NULL
);
"#;

/// Main index handle
pub struct VectorIndex {
    pub(crate) conn: Connection,
}

impl VectorIndex {
    /// Open (or create) an index at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory index (tests, ephemeral runs)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create tables if they do not exist
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(CREATE_TABLES)?;
        Ok(())
    }

    /// Upsert a resource point, keyed by URL.
    ///
    /// Re-ingesting the same URL replaces the vector and payload in full,
    /// so concurrent upserts of one resource are commutative.
    pub fn upsert(&self, resource: &Resource, embedding: &[f32]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let payload = serde_json::to_string(resource)?;
        let embedding_bytes = embedding_to_bytes(embedding);

        self.conn.execute(
            "INSERT INTO points (resource_id, url, embedding, payload, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(url) DO UPDATE SET
                resource_id = excluded.resource_id,
                embedding = excluded.embedding,
                payload = excluded.payload,
                updated_at = excluded.updated_at",
            params![
                resource.resource_id,
                resource.url,
                embedding_bytes,
                payload,
                now
            ],
        )?;

        Ok(())
    }

    /// Filtered nearest-neighbor query.
    ///
    /// Returns at most `top_k` candidates satisfying the predicate, ordered
    /// by descending cosine similarity. Fewer rows than `top_k` means fewer
    /// results; nothing is padded.
    pub fn query(
        &self,
        vector: &[f32],
        predicate: &Predicate,
        top_k: usize,
    ) -> Result<Vec<Candidate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT embedding, payload FROM points")?;

        let rows = stmt
            .query_map([], |row| {
                let embedding_bytes: Vec<u8> = row.get(0)?;
                let payload: String = row.get(1)?;
                Ok((bytes_to_embedding(&embedding_bytes), payload))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut scored: Vec<Candidate> = Vec::new();
        for (embedding, payload) in rows {
            let resource: Resource = serde_json::from_str(&payload)?;
            if !predicate.matches(&resource) {
                continue;
            }
            if embedding.len() != vector.len() {
                return Err(LearnPathError::Index(format!(
                    "query vector has {} dimensions, stored embedding for {} has {}",
                    vector.len(),
                    resource.resource_id,
                    embedding.len()
                )));
            }
            let score = cosine_similarity(vector, &embedding) as f64;
            scored.push(Candidate::new(resource, score));
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored)
    }

    /// Look up a resource payload by its id
    pub fn get(&self, resource_id: &str) -> Result<Option<Resource>> {
        let result = self.conn.query_row(
            "SELECT payload FROM points WHERE resource_id = ?1",
            params![resource_id],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of indexed points
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM points", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Register the embedding model and verify dimensions are unchanged.
    ///
    /// A dimension change means every stored vector is stale; refuse to mix.
    pub fn register_model(&self, model: &str, dimensions: usize) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        if let Some(stored) = self.get_model_dimensions(model)? {
            if stored != dimensions {
                return Err(LearnPathError::Index(format!(
                    "model {} dimensions changed: index has {}, embedder reports {}",
                    model, stored, dimensions
                )));
            }
        }

        self.conn.execute(
            "INSERT INTO model_metadata (model, dimensions, created_at, last_used_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(model) DO UPDATE SET last_used_at = ?3",
            params![model, dimensions as i64, now],
        )?;

        Ok(())
    }

    /// Get stored model dimensions
    pub fn get_model_dimensions(&self, model: &str) -> Result<Option<usize>> {
        let result = self.conn.query_row(
            "SELECT dimensions FROM model_metadata WHERE model = ?1",
            params![model],
            |row| row.get::<_, i64>(0),
        );

        match result {
            Ok(dims) => Ok(Some(dims as usize)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Summary counts for status reporting
    pub fn stats(&self) -> Result<IndexStats> {
        let point_count = self.count()?;
        let tenant_count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT json_extract(payload, '$.tenant_id')) FROM points",
            [],
            |row| row.get(0),
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT model, dimensions FROM model_metadata ORDER BY model")?;
        let models = stmt
            .query_map([], |row| {
                Ok(ModelInfo {
                    model: row.get(0)?,
                    dimensions: row.get::<_, i64>(1)? as usize,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(IndexStats {
            point_count,
            tenant_count: tenant_count as usize,
            models,
        })
    }
}

/// Index status summary
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub point_count: usize,
    pub tenant_count: usize,
    pub models: Vec<ModelInfo>,
}

/// Embedding model registered against the index
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model: String,
    pub dimensions: usize,
}

/// Convert f32 embedding to bytes (little-endian)
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes to f32 embedding
pub fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Field;

    fn test_index() -> VectorIndex {
        let index = VectorIndex::open_in_memory().unwrap();
        index.initialize().unwrap();
        index
    }

    #[test]
    fn test_embedding_roundtrip() {
        let original = vec![1.0f32, 2.0, 3.0, -1.5];
        let bytes = embedding_to_bytes(&original);
        let restored = bytes_to_embedding(&bytes);
        assert_eq!(original, restored);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.0001);
    }

    #[test]
    fn test_upsert_is_idempotent_by_url() {
        let index = test_index();

        let mut resource = Resource::new("r1", "Old Title", "https://e.com/a");
        index.upsert(&resource, &[1.0, 0.0]).unwrap();

        resource.title = "New Title".to_string();
        index.upsert(&resource, &[0.0, 1.0]).unwrap();

        assert_eq!(index.count().unwrap(), 1);
        let stored = index.get("r1").unwrap().unwrap();
        assert_eq!(stored.title, "New Title");
    }

    #[test]
    fn test_query_orders_by_similarity_and_respects_top_k() {
        let index = test_index();

        for (id, vec) in [
            ("r1", vec![1.0, 0.0]),
            ("r2", vec![0.9, 0.1]),
            ("r3", vec![0.0, 1.0]),
        ] {
            let resource = Resource::new(id, id, format!("https://e.com/{id}"));
            index.upsert(&resource, &vec).unwrap();
        }

        let pred = Predicate::Eq(Field::TenantId, "global".to_string());
        let hits = index.query(&[1.0, 0.0], &pred, 2).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].resource.resource_id, "r1");
        assert_eq!(hits[1].resource.resource_id, "r2");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_query_returns_fewer_when_index_is_small() {
        let index = test_index();
        let resource = Resource::new("r1", "only", "https://e.com/only");
        index.upsert(&resource, &[1.0, 0.0]).unwrap();

        let pred = Predicate::Eq(Field::TenantId, "global".to_string());
        let hits = index.query(&[1.0, 0.0], &pred, 10).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_query_rejects_dimension_mismatch() {
        let index = test_index();
        let resource = Resource::new("r1", "A", "https://e.com/a");
        index.upsert(&resource, &[1.0, 0.0]).unwrap();

        let pred = Predicate::Eq(Field::TenantId, "global".to_string());
        let err = index.query(&[1.0, 0.0, 0.0], &pred, 5).unwrap_err();
        assert!(matches!(err, LearnPathError::Index(_)));
        assert!(err.to_string().contains("dimensions"));
    }

    #[test]
    fn test_stats_counts_points_tenants_and_models() {
        let index = test_index();
        index.register_model("e5-base", 768).unwrap();

        let mut r1 = Resource::new("r1", "A", "https://e.com/a");
        r1.tenant_id = "acme".to_string();
        index.upsert(&r1, &[1.0, 0.0]).unwrap();
        let r2 = Resource::new("r2", "B", "https://e.com/b");
        index.upsert(&r2, &[0.0, 1.0]).unwrap();

        let stats = index.stats().unwrap();
        assert_eq!(stats.point_count, 2);
        assert_eq!(stats.tenant_count, 2);
        assert_eq!(stats.models.len(), 1);
        assert_eq!(stats.models[0].dimensions, 768);
    }

    #[test]
    fn test_register_model_rejects_dimension_change() {
        let index = test_index();
        index.register_model("e5-base", 768).unwrap();
        index.register_model("e5-base", 768).unwrap();

        let err = index.register_model("e5-base", 384).unwrap_err();
        assert!(matches!(err, LearnPathError::Index(_)));
    }
}
