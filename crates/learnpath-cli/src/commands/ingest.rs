//! Ingest command

use crate::app::IngestArgs;
use anyhow::{Context, Result};
use learnpath_core::{build_embedder, ingest_resources, Config, Resource, VectorIndex};

pub async fn run(args: IngestArgs, index: &VectorIndex, config: &Config) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let mut resources: Vec<Resource> = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    if let Some(tenant) = &args.tenant {
        for resource in &mut resources {
            resource.tenant_id = tenant.clone();
        }
    }

    let embedder = build_embedder(&config.inference)?;
    let count = ingest_resources(index, embedder.as_ref(), &resources).await?;

    println!("Ingested {} resources ({} total in index)", count, index.count()?);
    Ok(())
}
