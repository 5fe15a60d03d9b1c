//! Structured generation of plans and quizzes
//!
//! Both generators share the structured-output client: build a prompt
//! over retrieved candidates, validate the model's JSON against the
//! target schema, and enrich resolvable resource references.

mod plan;
mod quiz;

pub use plan::{
    enrich_plan, LearningPlan, Milestone, PlanGenerator, PlanRequest, PlanResource,
};
pub use quiz::{Quiz, QuizGenerator, QuizOption, QuizQuestion, ResourceSnippet};

use crate::resource::{Candidate, Resource};

/// Resolve a resource reference against the candidate set.
///
/// Enrichment is best-effort: a miss is not an error, the reference is
/// simply left with its model-supplied fields.
pub(crate) fn enrich_reference<'a>(
    resource_id: &str,
    candidates: &'a [Candidate],
) -> Option<&'a Resource> {
    candidates
        .iter()
        .map(|c| &c.resource)
        .find(|r| r.resource_id == resource_id)
}
