//! Search command

use crate::app::{OutputFormat, SearchArgs};
use anyhow::Result;
use learnpath_core::{
    build_embedder, build_reranker, run_search, Config, QueryFilter, SearchRequest, SearchResponse,
    VectorIndex,
};

pub async fn run(
    args: SearchArgs,
    index: &VectorIndex,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let query = args.query.join(" ");

    let mut request = SearchRequest::new(query);
    request.top_k = args.top_k.unwrap_or(config.search.top_k);
    request.rerank = !args.no_rerank;
    request.rerank_top_n = args.top.unwrap_or(config.search.rerank_top_n);
    request.filters = build_filters(&args);

    let embedder = build_embedder(&config.inference)?;
    let reranker = build_reranker(&config.inference)?;

    let response = run_search(index, embedder.as_ref(), reranker.as_ref(), &request).await?;

    print_results(&response, format)?;
    Ok(())
}

fn build_filters(args: &SearchArgs) -> Option<QueryFilter> {
    if args.tenant.is_none()
        && args.level.is_none()
        && args.max_duration.is_none()
        && args.media_type.is_none()
        && args.provider.is_none()
    {
        return None;
    }
    Some(QueryFilter {
        tenant_id: args.tenant.clone(),
        level: args.level.map(|l| l.ordinal()),
        max_duration_min: args.max_duration,
        skills: None,
        media_type: args.media_type.clone(),
        provider: args.provider.clone(),
    })
}

fn print_results(response: &SearchResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
        OutputFormat::Cli => {
            if response.results.is_empty() {
                println!("No resources matched '{}'.", response.query);
                return Ok(());
            }
            for (i, candidate) in response.results.iter().enumerate() {
                let r = &candidate.resource;
                println!("{}. [{:.4}] {} ({})", i + 1, candidate.score, r.title, r.resource_id);
                println!("   {}", r.url);
                if let Some(description) = &r.description {
                    println!("   {}", description);
                }
            }
            println!();
            println!(
                "{} results{}",
                response.total_found,
                if response.reranked { " (reranked)" } else { "" }
            );
        }
    }
    Ok(())
}
