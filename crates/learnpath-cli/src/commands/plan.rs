//! Plan command

use crate::app::{OutputFormat, PlanArgs};
use anyhow::Result;
use learnpath_core::{
    build_embedder, build_reranker, run_search, Config, InferenceClient, LearningPlan,
    PlanGenerator, PlanRequest, QueryFilter, SearchRequest, StructuredClient, VectorIndex,
};
use std::sync::Arc;

pub async fn run(
    args: PlanArgs,
    index: &VectorIndex,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let goal = args.goal.join(" ");

    // Retrieve candidate resources for the goal first
    let mut request = SearchRequest::new(goal.clone());
    request.top_k = config.search.top_k;
    request.rerank = true;
    request.rerank_top_n = config.search.rerank_top_n;
    if let Some(tenant) = &args.tenant {
        request.filters = Some(QueryFilter {
            tenant_id: Some(tenant.clone()),
            ..Default::default()
        });
    }

    let embedder = build_embedder(&config.inference)?;
    let reranker = build_reranker(&config.inference)?;
    let response = run_search(index, embedder.as_ref(), reranker.as_ref(), &request).await?;

    if response.results.is_empty() {
        println!("No resources found for '{}'. Ingest some first.", goal);
        return Ok(());
    }

    let chat = Arc::new(
        InferenceClient::new(config.inference.clone())?.with_generation(&config.generation),
    );
    let client = StructuredClient::new(chat).with_max_retries(config.generation.max_retries);
    let generator = PlanGenerator::new(client);

    let plan_request = PlanRequest {
        goal,
        current_skills: args.skills,
        time_budget_hours: args.budget,
        hours_per_week: args.per_week,
        preferences: args.preferences,
    };
    let plan = generator.generate(&plan_request, &response.results).await?;

    print_plan(&plan, format)?;
    Ok(())
}

fn print_plan(plan: &LearningPlan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(plan)?);
        }
        OutputFormat::Cli => {
            for milestone in &plan.milestones {
                println!("== {}. {} ==", milestone.order, milestone.title);
                println!("{}", milestone.description);
                for resource in &milestone.resources {
                    let title = resource.title.as_deref().unwrap_or(&resource.resource_id);
                    println!("  {}. {}", resource.order, title);
                    if let Some(url) = &resource.url {
                        println!("     {}", url);
                    }
                    println!("     Why: {}", resource.why_included);
                }
                if !milestone.skills_gained.is_empty() {
                    println!("  Skills gained: {}", milestone.skills_gained.join(", "));
                }
                println!();
            }
            println!("Reasoning: {}", plan.reasoning);
        }
    }
    Ok(())
}
