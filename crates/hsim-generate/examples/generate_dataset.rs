use std::path::PathBuf;

use hsim_core::SchemaGraph;
use hsim_generate::{GenerateOptions, GenerationEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/schema/htan_mini.jsonld")
        });
    let graph = SchemaGraph::load(&path)?;
    let result = GenerationEngine::new(GenerateOptions::default()).run(&graph)?;
    println!("{}", serde_json::to_string_pretty(&result.dataset)?);
    Ok(())
}
