//! Learning-plan generation

use super::enrich_reference;
use crate::error::Result;
use crate::llm::StructuredClient;
use crate::resource::Candidate;
use serde::{Deserialize, Serialize};

/// Resources included in the prompt, at most
const MAX_PROMPT_RESOURCES: usize = 30;

const PLAN_SYSTEM_INSTRUCTION: &str = "You are an expert learning path designer. Create \
    structured, achievable learning plans that respect prerequisites and time constraints. \
    Respond ONLY with valid JSON matching the requested schema.";

/// A resource reference inside a milestone.
///
/// The model supplies `resource_id`, `why_included`, and `order`; the
/// remaining fields are overlaid from the candidate set after validation
/// when the reference resolves. Unresolvable references keep only the
/// model-supplied fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResource {
    pub resource_id: String,
    pub why_included: String,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

/// One milestone of a learning plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub description: String,
    pub resources: Vec<PlanResource>,
    pub skills_gained: Vec<String>,
    pub order: u32,
}

/// Validated structured plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPlan {
    pub milestones: Vec<Milestone>,
    pub reasoning: String,
}

/// Inputs for plan generation
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub goal: String,
    pub current_skills: Vec<String>,
    pub time_budget_hours: u32,
    pub hours_per_week: u32,
    pub preferences: Option<String>,
}

/// Plan generator driving the structured-output client
pub struct PlanGenerator {
    client: StructuredClient,
}

impl PlanGenerator {
    pub fn new(client: StructuredClient) -> Self {
        Self { client }
    }

    /// Generate a plan from the goal and the retrieved candidate set.
    ///
    /// The validated plan is enriched best-effort: references resolving to
    /// a candidate gain its title/url/duration/level/skills.
    pub async fn generate(
        &self,
        request: &PlanRequest,
        candidates: &[Candidate],
    ) -> Result<LearningPlan> {
        let prompt = build_plan_prompt(request, candidates);
        let mut plan: LearningPlan = self
            .client
            .generate(PLAN_SYSTEM_INSTRUCTION, &prompt)
            .await?;

        enrich_plan(&mut plan, candidates);

        tracing::info!(
            milestones = plan.milestones.len(),
            goal = %request.goal,
            "plan generated"
        );

        Ok(plan)
    }
}

/// Overlay candidate fields onto every resolvable resource reference
pub fn enrich_plan(plan: &mut LearningPlan, candidates: &[Candidate]) {
    for milestone in &mut plan.milestones {
        for reference in &mut milestone.resources {
            if let Some(resource) = enrich_reference(&reference.resource_id, candidates) {
                reference.title = Some(resource.title.clone());
                reference.url = Some(resource.url.clone());
                reference.duration_min = resource.duration_min;
                reference.level = resource.level;
                reference.skills = Some(resource.skills.clone());
            }
        }
    }
}

fn build_plan_prompt(request: &PlanRequest, candidates: &[Candidate]) -> String {
    let resources_text = candidates
        .iter()
        .take(MAX_PROMPT_RESOURCES)
        .map(|c| {
            let r = &c.resource;
            format!(
                "- [{}] {} ({} min, Level: {})\n  URL: {}\n  Skills: {}",
                r.resource_id,
                r.title,
                r.duration_min.unwrap_or(0),
                r.level.map(|l| l.to_string()).unwrap_or_else(|| "N/A".to_string()),
                r.url,
                r.skills.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let current_skills = if request.current_skills.is_empty() {
        "None specified".to_string()
    } else {
        request.current_skills.join(", ")
    };

    format!(
        r#"Create a learning plan for the following goal:

GOAL: {goal}

CURRENT SKILLS: {current_skills}

TIME BUDGET: {budget} hours total, {per_week} hours per week

AVAILABLE RESOURCES:
{resources_text}

PREFERENCES: {preferences}

Create a structured learning plan with the following:
1. Break the goal into 3-5 milestones
2. Assign resources to each milestone in logical order
3. Respect prerequisites (beginner -> intermediate -> advanced)
4. Stay within the time budget
5. Explain why each resource is included

Format your response as JSON with this structure:
{{
  "milestones": [
    {{
      "title": "Milestone name",
      "description": "What will be learned",
      "resources": [
        {{
          "resource_id": "id from list",
          "why_included": "explanation",
          "order": 1
        }}
      ],
      "skills_gained": ["skill1", "skill2"],
      "order": 1
    }}
  ],
  "reasoning": "Overall explanation of the plan structure and progression"
}}

Ensure the total duration of selected resources fits within {budget} hours.
"#,
        goal = request.goal,
        current_skills = current_skills,
        budget = request.time_budget_hours,
        per_week = request.hours_per_week,
        resources_text = resources_text,
        preferences = request.preferences.as_deref().unwrap_or("None specified"),
    )
}
