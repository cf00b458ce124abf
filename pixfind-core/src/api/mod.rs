//! Backend API abstraction.
//!
//! All four client workflows talk to the catalog service through the
//! [`CatalogApi`] trait: [`HttpCatalogApi`] is the production implementation,
//! [`MockCatalogApi`] a deterministic in-memory one for tests and offline
//! development. Components never construct requests themselves; they hand a
//! typed query or payload to the trait and reconcile the typed outcome.

mod http;
mod mock;

pub use http::HttpCatalogApi;
pub use mock::MockCatalogApi;

use async_trait::async_trait;

use crate::error::Result;
use crate::product::{AddProductReceipt, ProductDetail, SearchQuery, SearchResult, SubmissionPayload};

/// Typed interface to the catalog backend.
///
/// Implementations must be thread-safe (`Send + Sync`). Every method maps to
/// exactly one backend request; callers own retry and serialization policy.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `POST /search/` — rank catalog items against the query image.
    ///
    /// The returned order is the server's ranking and must be preserved.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>>;

    /// `GET /products/{item_id}` — full detail for one item.
    ///
    /// A missing item surfaces as [`crate::CatalogError::NotFound`].
    async fn product_detail(&self, item_id: &str) -> Result<ProductDetail>;

    /// `POST /add_product` — register a new catalog item.
    async fn add_product(&self, payload: &SubmissionPayload) -> Result<AddProductReceipt>;

    /// `GET /images/{image_path}` — raw bytes of a stored image.
    async fn fetch_image(&self, image_path: &str) -> Result<Vec<u8>>;

    /// Absolute URL of a stored image, for consumers that render by URL
    /// instead of fetching bytes.
    fn image_url(&self, image_path: &str) -> String;
}
