//! Add command - register a new catalog item with its images.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use pixfind_core::{PreviewRegistry, SubmissionController};
use tracing::info;

use crate::utils;

/// Execute the add command.
pub async fn execute(
    api_url: Option<String>,
    item_id: String,
    product_type: String,
    name: String,
    main_image: Option<PathBuf>,
    other_images: Vec<PathBuf>,
) -> Result<()> {
    let api = utils::build_api(api_url)?;

    let mut previews = PreviewRegistry::new();
    let mut controller = SubmissionController::new();
    controller.fields_mut().item_id = item_id;
    controller.fields_mut().product_type = product_type;
    controller.fields_mut().item_name = name;

    if let Some(path) = &main_image {
        controller.select_main_image(&mut previews, Some(utils::load_image(path)?));
    }
    let mut others = Vec::with_capacity(other_images.len());
    for path in &other_images {
        others.push(utils::load_image(path)?);
    }
    controller.select_other_images(&mut previews, others);

    info!(
        item_id = %controller.fields().item_id,
        other_images = controller.other_images().len(),
        "Submitting new product"
    );
    println!(
        "{}",
        format!("⬆ Uploading {}...", controller.fields().item_id).dimmed()
    );

    let outcome = controller.submit(&mut previews, &api).await;
    let status = controller.status().clone();
    controller.teardown(&mut previews);

    match outcome {
        Ok(receipt) => {
            println!();
            println!("{}", status.message().green().bold());
            if let Some(id) = &receipt.item_id {
                println!("   {} {}", "Item:".dimmed(), id);
            }
            if let Some(id) = &receipt.main_image_id {
                println!("   {} {}", "Main image id:".dimmed(), id);
            }
            for id in &receipt.other_image_ids {
                println!("   {} {}", "Other image id:".dimmed(), id);
            }
            if let Some(message) = &receipt.message {
                println!("   {} {}", "Server:".dimmed(), message);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", status.message().red());
            Err(err.into())
        }
    }
}
