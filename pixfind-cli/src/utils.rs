//! Common utility functions shared across CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use pixfind_core::{ClientConfig, HttpCatalogApi, SelectedFile};
use tracing::debug;

/// Build the configured API client. An explicit `--api-url` wins over the
/// `PIXFIND_API_URL` environment variable.
pub fn build_api(api_url: Option<String>) -> Result<HttpCatalogApi> {
    let config = match api_url {
        Some(url) => ClientConfig::new(&url)?,
        None => ClientConfig::from_env()?,
    };
    debug!(base_url = %config.base_url(), "Using backend");
    Ok(HttpCatalogApi::new(config)?)
}

/// Load an image file into an in-memory selection.
pub fn load_image(path: &Path) -> Result<SelectedFile> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read image file: {}", path.display()))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();

    debug!(path = %path.display(), bytes = data.len(), "Read image file");
    Ok(SelectedFile::new(file_name, data))
}

/// Filename portion of a stored image path ("new/ABC123.jpg" -> "ABC123.jpg").
pub fn image_file_name(image_path: &str) -> &str {
    image_path.rsplit('/').next().unwrap_or(image_path)
}
