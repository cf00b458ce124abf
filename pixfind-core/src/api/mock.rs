//! In-memory mock of the catalog API for tests and offline development.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{CatalogError, Result};
use crate::product::{
    AddProductReceipt, ProductDetail, SearchQuery, SearchResult, SubmissionPayload,
};

use super::CatalogApi;

#[derive(Default)]
struct MockState {
    products: HashMap<String, ProductDetail>,
    images: HashMap<String, Vec<u8>>,
    search_queue: VecDeque<Result<Vec<SearchResult>>>,
    add_queue: VecDeque<Result<AddProductReceipt>>,
    search_calls: u64,
    detail_calls: u64,
    add_calls: u64,
    image_calls: u64,
}

/// Deterministic [`CatalogApi`] with scripted responses and call counters.
///
/// Responses are queued per operation; an empty queue yields the operation's
/// neutral success (empty result list, generic receipt). Detail lookups are
/// answered from an in-memory product table, missing ids are not found.
#[derive(Default)]
pub struct MockCatalogApi {
    state: Mutex<MockState>,
}

impl MockCatalogApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a product answered by [`CatalogApi::product_detail`].
    pub fn insert_product(&self, detail: ProductDetail) {
        self.state().products.insert(detail.item_id.clone(), detail);
    }

    /// Register image bytes answered by [`CatalogApi::fetch_image`].
    pub fn insert_image(&self, image_path: impl Into<String>, data: Vec<u8>) {
        self.state().images.insert(image_path.into(), data);
    }

    /// Queue the outcome of the next [`CatalogApi::search`] call.
    pub fn queue_search_response(&self, response: Result<Vec<SearchResult>>) {
        self.state().search_queue.push_back(response);
    }

    /// Queue the outcome of the next [`CatalogApi::add_product`] call.
    pub fn queue_add_response(&self, response: Result<AddProductReceipt>) {
        self.state().add_queue.push_back(response);
    }

    pub fn search_calls(&self) -> u64 {
        self.state().search_calls
    }

    pub fn detail_calls(&self) -> u64 {
        self.state().detail_calls
    }

    pub fn add_calls(&self) -> u64 {
        self.state().add_calls
    }

    pub fn image_calls(&self) -> u64 {
        self.state().image_calls
    }
}

#[async_trait]
impl CatalogApi for MockCatalogApi {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let mut state = self.state();
        state.search_calls += 1;
        state.search_queue.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn product_detail(&self, item_id: &str) -> Result<ProductDetail> {
        let mut state = self.state();
        state.detail_calls += 1;
        state
            .products
            .get(item_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(item_id.to_string()))
    }

    async fn add_product(&self, payload: &SubmissionPayload) -> Result<AddProductReceipt> {
        let mut state = self.state();
        state.add_calls += 1;
        state.add_queue.pop_front().unwrap_or_else(|| {
            Ok(AddProductReceipt {
                message: Some("Product added successfully to both CNN and CLIP indexes".to_string()),
                item_id: Some(payload.item_id.clone()),
                ..AddProductReceipt::default()
            })
        })
    }

    async fn fetch_image(&self, image_path: &str) -> Result<Vec<u8>> {
        let mut state = self.state();
        state.image_calls += 1;
        state
            .images
            .get(image_path)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(image_path.to_string()))
    }

    fn image_url(&self, image_path: &str) -> String {
        format!("mock://images/{image_path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ImageRef;

    fn detail(item_id: &str) -> ProductDetail {
        ProductDetail {
            item_id: item_id.to_string(),
            item_name: Vec::new(),
            product_type: Vec::new(),
            main_image: ImageRef {
                image_id: None,
                image_path: String::new(),
            },
            other_images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_detail_lookup_hits_registered_product() {
        let api = MockCatalogApi::new();
        api.insert_product(detail("B07X"));

        let found = api.product_detail("B07X").await.unwrap();
        assert_eq!(found.item_id, "B07X");
        assert!(matches!(
            api.product_detail("missing").await,
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(api.detail_calls(), 2);
    }

    #[tokio::test]
    async fn test_queued_search_responses_drain_in_order() {
        let api = MockCatalogApi::new();
        api.queue_search_response(Err(CatalogError::Network("connection reset".to_string())));
        api.queue_search_response(Ok(Vec::new()));

        let query = SearchQuery {
            image: crate::preview::SelectedFile::new("q.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0]),
            method: crate::product::SearchMethod::CnnFaiss,
            top_k: 10,
        };
        assert!(api.search(&query).await.is_err());
        assert!(api.search(&query).await.is_ok());
        // Queue exhausted: neutral success.
        assert_eq!(api.search(&query).await.unwrap(), Vec::new());
        assert_eq!(api.search_calls(), 3);
    }
}
