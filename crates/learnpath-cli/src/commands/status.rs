//! Status command

use crate::app::OutputFormat;
use anyhow::Result;
use learnpath_core::{Config, InferenceBackend, VectorIndex};

pub async fn run(index: &VectorIndex, config: &Config, format: OutputFormat) -> Result<()> {
    let stats = index.stats()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Cli => {
            println!("Resources:   {}", stats.point_count);
            println!("Tenants:     {}", stats.tenant_count);
            println!(
                "Backend:     {}",
                match config.inference.backend {
                    InferenceBackend::Remote => "remote",
                    InferenceBackend::Local => "local",
                }
            );
            if !stats.models.is_empty() {
                println!();
                println!("Models:");
                for model in &stats.models {
                    println!("  {} ({} dims)", model.model, model.dimensions);
                }
            }
        }
    }
    Ok(())
}
