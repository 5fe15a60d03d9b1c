//! Second-pass reranking of retrieved candidates

use crate::error::{LearnPathError, Result};
use crate::llm::Reranker;
use crate::resource::Candidate;

/// Rerank candidates and truncate to the top `top_n`.
///
/// One batched provider call scores every (query, document) pair; the
/// candidates are then stably sorted by score descending, so ties keep
/// their pre-rerank order. Each returned candidate's score field holds
/// the rerank score; the first-pass similarity is discarded. An empty
/// candidate list is a no-op, not an error.
pub async fn rerank_candidates(
    reranker: &dyn Reranker,
    query: &str,
    candidates: Vec<Candidate>,
    top_n: usize,
) -> Result<(Vec<Candidate>, Vec<f64>)> {
    if candidates.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let documents: Vec<String> = candidates.iter().map(|c| c.rerank_text()).collect();
    let scores = reranker.score(query, &documents).await?;

    if scores.len() != candidates.len() {
        return Err(LearnPathError::External(format!(
            "reranker returned {} scores for {} candidates",
            scores.len(),
            candidates.len()
        )));
    }

    let mut scored: Vec<(Candidate, f64)> = candidates.into_iter().zip(scores).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_n);

    let mut reranked = Vec::with_capacity(scored.len());
    let mut top_scores = Vec::with_capacity(scored.len());
    for (mut candidate, score) in scored {
        candidate.score = score;
        top_scores.push(score);
        reranked.push(candidate);
    }

    tracing::debug!(query, kept = reranked.len(), "rerank complete");

    Ok((reranked, top_scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Resource;
    use async_trait::async_trait;

    /// Reranker returning a fixed score per document text
    struct FixedReranker {
        scores: Vec<f64>,
    }

    #[async_trait]
    impl Reranker for FixedReranker {
        async fn score(&self, _query: &str, documents: &[String]) -> Result<Vec<f64>> {
            Ok(self.scores[..documents.len()].to_vec())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn candidate(id: &str, title: &str, similarity: f64) -> Candidate {
        Candidate::new(
            Resource::new(id, title, format!("https://e.com/{id}")),
            similarity,
        )
    }

    #[tokio::test]
    async fn test_empty_candidates_is_a_noop() {
        let reranker = FixedReranker { scores: vec![] };
        let (docs, scores) = rerank_candidates(&reranker, "q", vec![], 5).await.unwrap();
        assert!(docs.is_empty());
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn test_reorders_by_relevance_and_overwrites_scores() {
        let reranker = FixedReranker {
            scores: vec![0.1, 0.9],
        };
        let candidates = vec![
            candidate("r1", "Cooking", 0.8),
            candidate("r2", "Python Guide", 0.7),
        ];

        let (reranked, scores) = rerank_candidates(&reranker, "python tutorial", candidates, 2)
            .await
            .unwrap();

        assert_eq!(reranked[0].resource.title, "Python Guide");
        assert_eq!(reranked[1].resource.title, "Cooking");
        assert_eq!(scores, vec![0.9, 0.1]);
        // similarity scores gone, provider scores in their place
        assert_eq!(reranked[0].score, 0.9);
        assert_eq!(reranked[1].score, 0.1);
    }

    #[tokio::test]
    async fn test_ties_keep_pre_rerank_order() {
        let reranker = FixedReranker {
            scores: vec![0.5, 0.5, 0.5],
        };
        let candidates = vec![
            candidate("r1", "First", 0.9),
            candidate("r2", "Second", 0.8),
            candidate("r3", "Third", 0.7),
        ];

        let (reranked, _) = rerank_candidates(&reranker, "q", candidates, 3).await.unwrap();
        let ids: Vec<&str> = reranked
            .iter()
            .map(|c| c.resource.resource_id.as_str())
            .collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
    }

    #[tokio::test]
    async fn test_top_n_clamped_to_candidate_count() {
        let reranker = FixedReranker {
            scores: vec![0.3, 0.2],
        };
        let candidates = vec![candidate("r1", "A", 0.1), candidate("r2", "B", 0.2)];

        let (reranked, scores) = rerank_candidates(&reranker, "q", candidates, 10)
            .await
            .unwrap();
        assert_eq!(reranked.len(), 2);
        assert_eq!(scores.len(), 2);
    }

    #[tokio::test]
    async fn test_deterministic_backend_gives_stable_ordering() {
        let make = || {
            vec![
                candidate("r1", "Alpha", 0.3),
                candidate("r2", "Beta", 0.2),
                candidate("r3", "Gamma", 0.1),
            ]
        };
        let reranker = FixedReranker {
            scores: vec![0.2, 0.7, 0.4],
        };

        let (first, _) = rerank_candidates(&reranker, "q", make(), 3).await.unwrap();
        let (second, _) = rerank_candidates(&reranker, "q", make(), 3).await.unwrap();

        let order = |cs: &[Candidate]| -> Vec<String> {
            cs.iter().map(|c| c.resource.resource_id.clone()).collect()
        };
        assert_eq!(order(&first), order(&second));
        assert_eq!(order(&first), vec!["r2", "r3", "r1"]);
    }
}
