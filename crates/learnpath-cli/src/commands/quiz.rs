//! Quiz command

use crate::app::{OutputFormat, QuizArgs};
use anyhow::{bail, Result};
use learnpath_core::{
    Config, InferenceClient, Quiz, QuizGenerator, ResourceSnippet, StructuredClient, VectorIndex,
};
use std::sync::Arc;

pub async fn run(
    args: QuizArgs,
    index: &VectorIndex,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let mut snippets = Vec::with_capacity(args.resources.len());
    for resource_id in &args.resources {
        match index.get(resource_id)? {
            Some(resource) => {
                let content = resource
                    .description
                    .clone()
                    .unwrap_or_else(|| resource.title.clone());
                snippets.push(ResourceSnippet {
                    resource_id: resource.resource_id,
                    title: resource.title,
                    content,
                });
            }
            None => bail!("resource '{}' not found in index", resource_id),
        }
    }

    let chat = Arc::new(
        InferenceClient::new(config.inference.clone())?.with_generation(&config.generation),
    );
    let client = StructuredClient::new(chat).with_max_retries(config.generation.max_retries);
    let generator = QuizGenerator::new(client);

    let quiz = generator
        .generate(&snippets, args.questions, args.difficulty.as_deref())
        .await?;

    print_quiz(&quiz, format)?;
    Ok(())
}

fn print_quiz(quiz: &Quiz, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(quiz)?);
        }
        OutputFormat::Cli => {
            for (i, question) in quiz.questions.iter().enumerate() {
                println!("{}. {}", i + 1, question.question_text);
                for option in &question.options {
                    println!("   {}) {}", option.id, option.text);
                }
                println!("   Answer: {}", question.correct_option);
                println!("   {}", question.explanation);
                println!("   Source: {} ({})", question.citation, question.source_resource_id);
                println!();
            }
        }
    }
    Ok(())
}
