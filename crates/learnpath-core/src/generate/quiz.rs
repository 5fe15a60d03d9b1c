//! Citation-backed quiz generation

use crate::error::Result;
use crate::llm::StructuredClient;
use serde::{Deserialize, Serialize};

const QUIZ_SYSTEM_INSTRUCTION: &str = "You are an expert educator creating quiz questions. \
    Every question MUST include a specific citation from the source material. Questions must \
    be clear, unambiguous, and have only one correct answer. Respond ONLY with valid JSON \
    matching the requested schema.";

/// Content excerpt the questions are drawn from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSnippet {
    pub resource_id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question_text: String,
    pub options: Vec<QuizOption>,
    pub correct_option: String,
    pub explanation: String,
    pub source_resource_id: String,
    /// Quote or reference from the source material backing the answer
    pub citation: String,
}

/// Validated structured quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

/// Quiz generator driving the structured-output client
pub struct QuizGenerator {
    client: StructuredClient,
}

impl QuizGenerator {
    pub fn new(client: StructuredClient) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        snippets: &[ResourceSnippet],
        num_questions: usize,
        difficulty: Option<&str>,
    ) -> Result<Quiz> {
        let prompt = build_quiz_prompt(snippets, num_questions, difficulty);
        let quiz: Quiz = self
            .client
            .generate(QUIZ_SYSTEM_INSTRUCTION, &prompt)
            .await?;

        tracing::info!(questions = quiz.questions.len(), "quiz generated");

        Ok(quiz)
    }
}

fn build_quiz_prompt(
    snippets: &[ResourceSnippet],
    num_questions: usize,
    difficulty: Option<&str>,
) -> String {
    let snippets_text = snippets
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "[Resource {}: {}]\nTitle: {}\nContent:\n{}",
                i + 1,
                s.resource_id,
                s.title,
                s.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let difficulty_instruction = difficulty
        .map(|d| format!("\nDifficulty level: {}", d))
        .unwrap_or_default();

    format!(
        r#"Generate {num} multiple-choice quiz questions based on the following learning resources.

RESOURCES:
{snippets_text}

REQUIREMENTS:
1. Each question must have 4 options (A, B, C, D)
2. Only ONE option should be correct
3. Include a clear explanation for the correct answer
4. CRITICAL: Include a specific citation (quote or reference) from the source material
5. Questions should test understanding, not just memorization{difficulty_instruction}

Format your response as JSON:
{{
  "questions": [
    {{
      "question_text": "What is...",
      "options": [
        {{"id": "A", "text": "Option A"}},
        {{"id": "B", "text": "Option B"}},
        {{"id": "C", "text": "Option C"}},
        {{"id": "D", "text": "Option D"}}
      ],
      "correct_option": "A",
      "explanation": "Explanation of why A is correct",
      "source_resource_id": "resource_id",
      "citation": "Specific quote or reference from the resource"
    }}
  ]
}}

Generate exactly {num} questions.
"#,
        num = num_questions,
        snippets_text = snippets_text,
        difficulty_instruction = difficulty_instruction,
    )
}
