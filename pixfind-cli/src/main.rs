//! Pixfind CLI - image-based product search and catalog ingestion.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

const EXIT_CODE_HELP: &str = "Exit codes:
  0   success
  1   general error
  64  invalid input (validation failed)
  65  item not found
  66  cannot read an input file
  69  backend unreachable or request rejected
  74  cannot write an output file";

#[derive(Parser)]
#[command(name = "pixfind")]
#[command(author, version, about = "Image-based product search and catalog ingestion", long_about = None)]
#[command(after_help = EXIT_CODE_HELP)]
struct Cli {
    /// Backend base URL (overrides PIXFIND_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog for items visually similar to an image
    Search {
        /// Path to the query image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Retrieval method: cnn_faiss, clip_faiss or clip_gemini_chroma
        #[arg(short, long, default_value = "cnn_faiss")]
        method: String,

        /// Number of results to request (the backend accepts 1-50)
        #[arg(long, default_value_t = pixfind_core::DEFAULT_TOP_K)]
        top_k: u32,
    },

    /// Show the stored detail of one catalog item
    Show {
        /// Item id to look up
        #[arg(value_name = "ITEM_ID")]
        item_id: String,

        /// Download the item's stored images into this directory
        #[arg(long, value_name = "DIR")]
        save_images: Option<PathBuf>,
    },

    /// Register a new catalog item with its images
    Add {
        /// Item id of the new product
        #[arg(long)]
        item_id: String,

        /// Product type label
        #[arg(long)]
        product_type: String,

        /// Item name (wrapped as a localized value for the backend)
        #[arg(long)]
        name: String,

        /// Path to the main product image
        #[arg(long, value_name = "IMAGE")]
        main_image: Option<PathBuf>,

        /// Additional product image (repeatable)
        #[arg(long = "other-image", value_name = "IMAGE")]
        other_images: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url;

    let result = match cli.command {
        Commands::Search {
            image,
            method,
            top_k,
        } => commands::search::execute(api_url, image, method, top_k).await,
        Commands::Show {
            item_id,
            save_images,
        } => commands::show::execute(api_url, item_id, save_images).await,
        Commands::Add {
            item_id,
            product_type,
            name,
            main_image,
            other_images,
        } => {
            commands::add::execute(api_url, item_id, product_type, name, main_image, other_images)
                .await
        }
    };

    if let Err(err) = result {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(exit_codes::classify(&err));
    }
}
