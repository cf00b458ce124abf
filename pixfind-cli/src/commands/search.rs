//! Search command - query the catalog with an image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use pixfind_core::{CatalogApi, PreviewRegistry, SearchMethod, SearchOrchestrator};
use tracing::info;

use crate::utils;

/// Execute the search command.
pub async fn execute(
    api_url: Option<String>,
    image: PathBuf,
    method: String,
    top_k: u32,
) -> Result<()> {
    let method: SearchMethod = method.parse()?;
    let api = utils::build_api(api_url)?;

    let file = utils::load_image(&image)?;
    info!(path = %image.display(), method = %method, top_k, "Submitting search");

    let mut previews = PreviewRegistry::new();
    let mut orchestrator = SearchOrchestrator::new();
    orchestrator.set_method(method);
    orchestrator.set_top_k(top_k);
    orchestrator.select_image(&mut previews, Some(file));

    println!(
        "{}",
        format!("🔍 Searching with {}...", method.label()).dimmed()
    );

    let outcome = orchestrator.submit(&api).await;
    let results = orchestrator.results().to_vec();
    orchestrator.teardown(&mut previews);
    outcome.context("Search failed")?;

    println!();
    if results.is_empty() {
        println!("{}", "No matches found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Top {} matches", results.len()).green().bold());
    println!();
    for (rank, result) in results.iter().enumerate() {
        println!(
            "   {} {}  {} {:.4}",
            format!("{:>2}.", rank + 1).dimmed(),
            result.item_id.as_str().bold(),
            "score".dimmed(),
            result.score
        );
        println!("       {}", api.image_url(&result.image_path).cyan());
    }

    Ok(())
}
