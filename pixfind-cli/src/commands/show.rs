//! Show command - fetch and display one catalog item's detail.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pixfind_core::{CatalogApi, DetailRetriever, DetailState, ProductDetail};
use tracing::info;

use crate::utils;

/// Execute the show command.
pub async fn execute(
    api_url: Option<String>,
    item_id: String,
    save_images: Option<PathBuf>,
) -> Result<()> {
    let api = utils::build_api(api_url)?;

    let mut retriever = DetailRetriever::new();
    info!(item_id = %item_id, "Looking up product detail");

    match retriever.retrieve(&api, Some(&item_id)).await {
        DetailState::Loaded(detail) => {
            print_detail(detail, &api);
            if let Some(dir) = save_images {
                download_images(detail, &api, &dir).await?;
            }
            Ok(())
        }
        DetailState::NotFound { message } => {
            println!("{}", message.as_str().red());
            bail!("{message} ({item_id})")
        }
        // retrieve() always completes the fetch it issues.
        DetailState::Empty | DetailState::Loading { .. } => {
            bail!("detail lookup did not complete")
        }
    }
}

fn print_detail(detail: &ProductDetail, api: &dyn CatalogApi) {
    println!();
    println!("{}", format!("📦 {}", detail.item_id).bold());

    for name in &detail.item_name {
        println!(
            "   {} {}",
            format!("[{}]", name.language_tag).dimmed(),
            name.value
        );
    }
    if !detail.product_type.is_empty() {
        println!(
            "   {} {}",
            "Type:".dimmed(),
            detail.product_type.join(", ")
        );
    }

    if detail.main_image.image_path.is_empty() {
        println!("   {} {}", "Main image:".dimmed(), "none stored".yellow());
    } else {
        println!(
            "   {} {}",
            "Main image:".dimmed(),
            api.image_url(&detail.main_image.image_path).cyan()
        );
    }
    for (index, image) in detail.other_images.iter().enumerate() {
        println!(
            "   {} {}",
            format!("Other {}:", index + 1).dimmed(),
            api.image_url(&image.image_path).cyan()
        );
    }
}

/// Download every stored image of the item into `dir`.
async fn download_images(
    detail: &ProductDetail,
    api: &dyn CatalogApi,
    dir: &PathBuf,
) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to write to {}", dir.display()))?;

    let mut paths = Vec::new();
    if !detail.main_image.image_path.is_empty() {
        paths.push(detail.main_image.image_path.as_str());
    }
    paths.extend(detail.other_images.iter().map(|i| i.image_path.as_str()));

    println!();
    for path in paths {
        let bytes = api
            .fetch_image(path)
            .await
            .with_context(|| format!("Failed to download {path}"))?;
        let target = dir.join(utils::image_file_name(path));
        std::fs::write(&target, bytes)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        println!("   {} {}", "Saved:".dimmed(), target.display());
    }

    Ok(())
}
