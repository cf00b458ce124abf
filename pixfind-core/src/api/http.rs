//! HTTP implementation of the catalog API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{CatalogError, Result};
use crate::preview::SelectedFile;
use crate::product::{
    AddProductReceipt, ProductDetail, SearchQuery, SearchResponse, SearchResult, SubmissionPayload,
};

use super::CatalogApi;

/// Error body shape the backend uses for rejections.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Catalog client backed by a real HTTP backend.
pub struct HttpCatalogApi {
    client: Client,
    config: ClientConfig,
}

impl HttpCatalogApi {
    /// Build a client for the configured backend. The transport timeout is
    /// applied to every request; there are no transport-level retries, so
    /// each operation issues exactly one request.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a multipart file part under the given upload filename.
    fn file_part(file: &SelectedFile, upload_name: &str) -> Result<Part> {
        let mut part = Part::bytes(file.data.clone()).file_name(upload_name.to_string());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        Ok(part)
    }

    /// Turn a non-2xx response into a typed error, probing the body for the
    /// backend's `{"detail": ...}` shape.
    async fn error_from_response(response: Response) -> CatalogError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail);

        warn!(status = %status, detail = ?detail, "Backend rejected request");
        CatalogError::Server {
            status: status.as_u16(),
            detail,
        }
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let url = self.config.search_url();
        debug!(method = %query.method, top_k = query.top_k, "Dispatching search");

        let form = Form::new()
            .part("file", Self::file_part(&query.image, &query.image.file_name)?)
            .text("method", query.method.as_str())
            .text("top_k", query.top_k.to_string());

        let response = self.client.post(url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            CatalogError::Serialization(format!("failed to decode search response: {e}"))
        })?;

        debug!(results = body.results.len(), "Search completed");
        Ok(body.results)
    }

    async fn product_detail(&self, item_id: &str) -> Result<ProductDetail> {
        let url = self.config.product_url(item_id);
        debug!(item_id, "Fetching product detail");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(item_id.to_string())),
            status if !status.is_success() => Err(Self::error_from_response(response).await),
            _ => response.json().await.map_err(|e| {
                CatalogError::Serialization(format!("failed to decode product detail: {e}"))
            }),
        }
    }

    async fn add_product(&self, payload: &SubmissionPayload) -> Result<AddProductReceipt> {
        let url = self.config.add_product_url();
        debug!(
            item_id = %payload.item_id,
            other_images = payload.other_images.len(),
            "Uploading new product"
        );

        let mut form = Form::new()
            .text("item_id", payload.item_id.clone())
            .text("product_type", payload.product_type.clone())
            .text("item_name", payload.item_name_json.clone())
            .part(
                "main_image",
                Self::file_part(&payload.main_image.file, &payload.main_image.upload_name)?,
            );
        for other in &payload.other_images {
            form = form.part("other_images", Self::file_part(&other.file, &other.upload_name)?);
        }

        let response = self.client.post(url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response.json().await.map_err(|e| {
            CatalogError::Serialization(format!("failed to decode add_product response: {e}"))
        })
    }

    async fn fetch_image(&self, image_path: &str) -> Result<Vec<u8>> {
        let url = self.config.image_url(image_path);
        debug!(image_path, "Fetching image asset");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(image_path.to_string())),
            status if !status.is_success() => Err(Self::error_from_response(response).await),
            _ => Ok(response.bytes().await?.to_vec()),
        }
    }

    fn image_url(&self, image_path: &str) -> String {
        self.config.image_url(image_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_part_accepts_missing_content_type() {
        let file = SelectedFile {
            file_name: "raw.bin".to_string(),
            content_type: None,
            data: vec![1, 2, 3],
        };
        assert!(HttpCatalogApi::file_part(&file, "raw.bin").is_ok());
    }

    #[test]
    fn test_error_body_probe() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"duplicate item"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("duplicate item"));

        let empty: std::result::Result<ErrorBody, _> = serde_json::from_str("not json");
        assert!(empty.is_err());
    }
}
