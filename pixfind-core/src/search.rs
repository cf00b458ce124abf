//! Search-execution state machine.
//!
//! Drives the "submit an image, pick a method, get ranked results" flow.
//! The flow is split into an explicit two-phase transition — [`SearchOrchestrator::begin`]
//! validates and snapshots the query, [`SearchOrchestrator::finish`] reconciles
//! the outcome — with [`SearchOrchestrator::submit`] composing the two around
//! a single backend call. The view disables the submit control whenever
//! [`SearchOrchestrator::is_in_flight`] is true; a `begin` while in flight is
//! a caller error and is rejected without issuing a request.

use tracing::{debug, warn};

use crate::api::CatalogApi;
use crate::error::{CatalogError, Result};
use crate::preview::{PreviewRegistry, PreviewSlot, SelectedFile};
use crate::product::{SearchMethod, SearchQuery, SearchResult};

/// Default number of results requested when the form does not override it.
pub const DEFAULT_TOP_K: u32 = 10;

const MISSING_IMAGE_MESSAGE: &str = "Please select an image to search";
const FAILURE_MESSAGE: &str = "Search failed, please try again";

/// Where the search flow currently stands.
///
/// `Succeeded` renders as idle-with-results; `Failed` carries a user-visible
/// message and allows retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Proof of a started search: holds the immutable query snapshot and must be
/// handed back to [`SearchOrchestrator::finish`]. Not `Clone`, so each begun
/// search is finished at most once.
#[derive(Debug)]
pub struct PendingSearch {
    query: SearchQuery,
}

impl PendingSearch {
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }
}

/// Owns the search form state and the result list.
pub struct SearchOrchestrator {
    image: Option<SelectedFile>,
    preview: PreviewSlot,
    method: SearchMethod,
    top_k: u32,
    phase: SearchPhase,
    results: Vec<SearchResult>,
    error: Option<String>,
}

impl SearchOrchestrator {
    pub fn new() -> Self {
        Self {
            image: None,
            preview: PreviewSlot::new(),
            method: SearchMethod::default(),
            top_k: DEFAULT_TOP_K,
            phase: SearchPhase::Idle,
            results: Vec::new(),
            error: None,
        }
    }

    /// Replace the query image. The previous preview handle is released
    /// before a new one is derived.
    pub fn select_image(&mut self, registry: &mut PreviewRegistry, file: Option<SelectedFile>) {
        self.preview.replace(registry, file.as_ref());
        self.image = file;
    }

    /// Change the retrieval method for the next query. A request already in
    /// flight keeps the method it was dispatched with.
    pub fn set_method(&mut self, method: SearchMethod) {
        self.method = method;
    }

    pub fn set_top_k(&mut self, top_k: u32) {
        self.top_k = top_k;
    }

    pub fn method(&self) -> SearchMethod {
        self.method
    }

    pub fn image(&self) -> Option<&SelectedFile> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> &PreviewSlot {
        &self.preview
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == SearchPhase::InFlight
    }

    /// Ranked results of the last completed search, in server order.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// User-visible message for the last validation or search failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate the form and transition to in-flight.
    ///
    /// With no image selected this fails before any network activity and the
    /// message is surfaced through [`SearchOrchestrator::error`]. Entered
    /// state (image, results) is preserved for retry.
    pub fn begin(&mut self) -> Result<PendingSearch> {
        if self.phase == SearchPhase::InFlight {
            warn!("Search submitted while another is in flight");
            return Err(CatalogError::Validation(
                "a search is already in flight".to_string(),
            ));
        }

        let Some(image) = &self.image else {
            self.phase = SearchPhase::Failed;
            self.error = Some(MISSING_IMAGE_MESSAGE.to_string());
            return Err(CatalogError::Validation(MISSING_IMAGE_MESSAGE.to_string()));
        };

        self.phase = SearchPhase::InFlight;
        self.error = None;

        Ok(PendingSearch {
            query: SearchQuery {
                image: image.clone(),
                method: self.method,
                top_k: self.top_k,
            },
        })
    }

    /// Reconcile the outcome of the pending search.
    ///
    /// Success stores the ranked results verbatim; failure clears them, sets
    /// a generic message and leaves the form intact for retry. The error is
    /// handed back for callers that map it further.
    pub fn finish(
        &mut self,
        pending: PendingSearch,
        outcome: Result<Vec<SearchResult>>,
    ) -> Result<()> {
        let PendingSearch { query } = pending;
        match outcome {
            Ok(results) => {
                debug!(results = results.len(), method = %query.method, "Search succeeded");
                self.results = results;
                self.phase = SearchPhase::Succeeded;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, method = %query.method, "Search failed");
                self.results.clear();
                self.phase = SearchPhase::Failed;
                self.error = Some(FAILURE_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    /// Run one full search: validate, issue exactly one backend call,
    /// reconcile.
    pub async fn submit(&mut self, api: &dyn CatalogApi) -> Result<()> {
        let pending = self.begin()?;
        let outcome = api.search(pending.query()).await;
        self.finish(pending, outcome)
    }

    /// Teardown path for the owning view; releases the preview acquisition.
    pub fn teardown(&mut self, registry: &mut PreviewRegistry) {
        self.preview.clear(registry);
    }
}

impl Default for SearchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockCatalogApi;

    fn image() -> SelectedFile {
        SelectedFile::new("query.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    fn result(item_id: &str, image_path: &str, score: f32) -> SearchResult {
        SearchResult {
            image_id: None,
            item_id: item_id.to_string(),
            image_path: image_path.to_string(),
            score,
        }
    }

    #[tokio::test]
    async fn test_submit_without_image_is_rejected_before_any_request() {
        let api = MockCatalogApi::new();
        let mut orchestrator = SearchOrchestrator::new();

        let err = orchestrator.submit(&api).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(orchestrator.phase(), SearchPhase::Failed);
        assert_eq!(orchestrator.error(), Some(MISSING_IMAGE_MESSAGE));
        assert_eq!(api.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_search_preserves_server_ranking() {
        let api = MockCatalogApi::new();
        api.queue_search_response(Ok(vec![
            result("X1", "x1.jpg", 0.98),
            result("X2", "x2.jpg", 0.81),
        ]));

        let mut registry = PreviewRegistry::new();
        let mut orchestrator = SearchOrchestrator::new();
        orchestrator.set_method(SearchMethod::ClipFaiss);
        orchestrator.select_image(&mut registry, Some(image()));

        orchestrator.submit(&api).await.unwrap();

        assert_eq!(orchestrator.phase(), SearchPhase::Succeeded);
        let items: Vec<&str> = orchestrator
            .results()
            .iter()
            .map(|r| r.item_id.as_str())
            .collect();
        assert_eq!(items, ["X1", "X2"]);
    }

    #[tokio::test]
    async fn test_failure_clears_results_and_allows_retry() {
        let api = MockCatalogApi::new();
        api.queue_search_response(Ok(vec![result("X1", "x1.jpg", 0.98)]));
        api.queue_search_response(Err(CatalogError::Server {
            status: 500,
            detail: None,
        }));
        api.queue_search_response(Ok(vec![result("X2", "x2.jpg", 0.70)]));

        let mut registry = PreviewRegistry::new();
        let mut orchestrator = SearchOrchestrator::new();
        orchestrator.select_image(&mut registry, Some(image()));

        orchestrator.submit(&api).await.unwrap();
        assert_eq!(orchestrator.results().len(), 1);

        assert!(orchestrator.submit(&api).await.is_err());
        assert_eq!(orchestrator.phase(), SearchPhase::Failed);
        assert!(orchestrator.results().is_empty());
        assert_eq!(orchestrator.error(), Some(FAILURE_MESSAGE));

        // The image is still selected; retry succeeds.
        orchestrator.submit(&api).await.unwrap();
        assert_eq!(orchestrator.results().len(), 1);
    }

    #[tokio::test]
    async fn test_second_begin_while_in_flight_is_rejected() {
        let api = MockCatalogApi::new();
        let mut registry = PreviewRegistry::new();
        let mut orchestrator = SearchOrchestrator::new();
        orchestrator.select_image(&mut registry, Some(image()));

        let pending = orchestrator.begin().unwrap();
        assert!(orchestrator.is_in_flight());

        assert!(orchestrator.begin().is_err());
        assert_eq!(api.search_calls(), 0);

        let outcome = api.search(pending.query()).await;
        orchestrator.finish(pending, outcome).unwrap();
        assert_eq!(orchestrator.phase(), SearchPhase::Succeeded);
    }

    #[test]
    fn test_method_change_does_not_affect_dispatched_query() {
        let mut registry = PreviewRegistry::new();
        let mut orchestrator = SearchOrchestrator::new();
        orchestrator.select_image(&mut registry, Some(image()));
        orchestrator.set_method(SearchMethod::CnnFaiss);

        let pending = orchestrator.begin().unwrap();
        orchestrator.set_method(SearchMethod::ClipGeminiChroma);

        assert_eq!(pending.query().method, SearchMethod::CnnFaiss);
        assert_eq!(orchestrator.method(), SearchMethod::ClipGeminiChroma);
    }

    #[test]
    fn test_selecting_a_new_image_swaps_the_preview() {
        let mut registry = PreviewRegistry::new();
        let mut orchestrator = SearchOrchestrator::new();

        orchestrator.select_image(&mut registry, Some(image()));
        assert!(!orchestrator.preview().is_empty());

        orchestrator.select_image(&mut registry, None);
        assert!(orchestrator.preview().is_empty());
        assert_eq!(registry.live(), 0);

        orchestrator.select_image(&mut registry, Some(image()));
        orchestrator.teardown(&mut registry);
        assert_eq!(registry.derived(), registry.released());
    }
}
