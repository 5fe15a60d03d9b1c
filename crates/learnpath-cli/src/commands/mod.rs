//! CLI command handlers

pub mod ingest;
pub mod plan;
pub mod quiz;
pub mod search;
pub mod status;
