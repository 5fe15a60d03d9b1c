//! End-to-end tests for plan and quiz generation against a scripted
//! chat backend, covering extraction, validation, retry, and enrichment.

use async_trait::async_trait;
use learnpath_core::{
    Candidate, ChatMessage, ChatModel, LearnPathError, PlanGenerator, PlanRequest, QuizGenerator,
    Resource, ResourceSnippet, Result, StructuredClient,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Chat model replaying a fixed script of responses
struct ScriptedChat {
    responses: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedChat {
    fn new(responses: Vec<&str>) -> Arc<Self> {
        let mut responses: Vec<String> = responses.into_iter().map(|s| s.to_string()).collect();
        responses.reverse();
        Arc::new(Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn chat_completion(&self, _messages: Vec<ChatMessage>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        responses
            .pop()
            .ok_or_else(|| LearnPathError::External("script exhausted".to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn plan_json(resource_id: &str) -> String {
    format!(
        r#"{{
            "milestones": [{{
                "title": "Foundations",
                "description": "Core syntax and tooling",
                "resources": [{{
                    "resource_id": "{resource_id}",
                    "why_included": "covers the basics",
                    "order": 1
                }}],
                "skills_gained": ["syntax"],
                "order": 1
            }}],
            "reasoning": "start from fundamentals"
        }}"#
    )
}

fn candidate(id: &str) -> Candidate {
    let mut resource = Resource::new(id, "Rust Fundamentals", format!("https://e.com/{id}"));
    resource.duration_min = Some(90);
    resource.level = Some(1);
    resource.skills = vec!["syntax".to_string()];
    Candidate::new(resource, 0.8)
}

fn plan_request() -> PlanRequest {
    PlanRequest {
        goal: "learn rust".to_string(),
        current_skills: vec![],
        time_budget_hours: 20,
        hours_per_week: 5,
        preferences: None,
    }
}

#[tokio::test]
async fn test_plan_generated_and_enriched_from_fenced_output() {
    // Model wraps its JSON in a fenced block, prose around it
    let fenced = format!("Here is the plan:\n```json\n{}\n```\nHope it helps!", plan_json("r1"));
    let chat = ScriptedChat::new(vec![&fenced]);
    let generator = PlanGenerator::new(StructuredClient::new(chat.clone()));

    let plan = generator
        .generate(&plan_request(), &[candidate("r1")])
        .await
        .unwrap();

    assert_eq!(chat.calls(), 1);
    assert_eq!(plan.milestones.len(), 1);
    let reference = &plan.milestones[0].resources[0];
    assert_eq!(reference.title.as_deref(), Some("Rust Fundamentals"));
    assert_eq!(reference.url.as_deref(), Some("https://e.com/r1"));
    assert_eq!(reference.duration_min, Some(90));
}

#[tokio::test]
async fn test_plan_retry_recovers_from_schema_violation() {
    // First answer drops the required reasoning field
    let broken = r#"{"milestones": []}"#;
    let fixed = plan_json("r1");
    let chat = ScriptedChat::new(vec![broken, &fixed]);
    let generator = PlanGenerator::new(StructuredClient::new(chat.clone()));

    let plan = generator
        .generate(&plan_request(), &[candidate("r1")])
        .await
        .unwrap();

    assert_eq!(chat.calls(), 2);
    assert_eq!(plan.reasoning, "start from fundamentals");
}

#[tokio::test]
async fn test_plan_with_unknown_reference_survives_enrichment() {
    let raw = plan_json("ghost");
    let chat = ScriptedChat::new(vec![&raw]);
    let generator = PlanGenerator::new(StructuredClient::new(chat));

    let plan = generator
        .generate(&plan_request(), &[candidate("r1")])
        .await
        .unwrap();

    let reference = &plan.milestones[0].resources[0];
    assert_eq!(reference.resource_id, "ghost");
    assert!(reference.title.is_none());
    assert!(reference.url.is_none());
    assert_eq!(reference.why_included, "covers the basics");
}

#[tokio::test]
async fn test_quiz_generation_fails_after_exhausting_retries() {
    let chat = ScriptedChat::new(vec![
        "I cannot produce JSON right now.",
        "Still prose, sorry.",
        "More prose.",
    ]);
    let generator = QuizGenerator::new(StructuredClient::new(chat.clone()));

    let snippets = vec![ResourceSnippet {
        resource_id: "r1".to_string(),
        title: "Ownership".to_string(),
        content: "Ownership is Rust's memory model.".to_string(),
    }];

    let err = generator.generate(&snippets, 3, None).await.unwrap_err();
    assert!(matches!(err, LearnPathError::Validation(_)));
    assert_eq!(chat.calls(), 3);
}

#[tokio::test]
async fn test_quiz_parses_bare_json_with_surrounding_prose() {
    let raw = r#"Sure! {"questions": [{
        "question_text": "What does ownership govern?",
        "options": [
            {"id": "A", "text": "Memory"},
            {"id": "B", "text": "Networking"},
            {"id": "C", "text": "Syntax"},
            {"id": "D", "text": "Macros"}
        ],
        "correct_option": "A",
        "explanation": "Ownership governs memory management.",
        "source_resource_id": "r1",
        "citation": "Ownership is Rust's memory model."
    }]} That's the quiz."#;
    let chat = ScriptedChat::new(vec![raw]);
    let generator = QuizGenerator::new(StructuredClient::new(chat));

    let snippets = vec![ResourceSnippet {
        resource_id: "r1".to_string(),
        title: "Ownership".to_string(),
        content: "Ownership is Rust's memory model.".to_string(),
    }];

    let quiz = generator.generate(&snippets, 1, Some("easy")).await.unwrap();
    assert_eq!(quiz.questions.len(), 1);
    assert_eq!(quiz.questions[0].correct_option, "A");
    assert_eq!(
        quiz.questions[0].citation,
        "Ownership is Rust's memory model."
    );
}
