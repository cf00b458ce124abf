//! On-demand detail retrieval for the currently selected catalog item.
//!
//! Retrieval is keyed by the selected item identity and re-triggered on every
//! identity change. Responses apply latest-wins: each identity change bumps a
//! generation counter and every outstanding fetch carries the generation it
//! was issued under; on resolution the result is applied only if its
//! generation is still current, otherwise it is discarded. The request on the
//! wire is never cancelled, only its result is dropped.

use tracing::{debug, warn};

use crate::api::CatalogApi;
use crate::error::{CatalogError, Result};
use crate::product::ProductDetail;

const NOT_FOUND_MESSAGE: &str = "Product not found";

/// Detail view state for the current identity.
///
/// `NotFound` is terminal for its identity and distinct from `Empty`: it
/// renders an explicit message instead of blank content.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Empty,
    Loading { item_id: String },
    Loaded(ProductDetail),
    NotFound { message: String },
}

/// An issued fetch, tagged with the generation it belongs to. Not `Clone`;
/// hand it back to [`DetailRetriever::complete`] exactly once.
#[derive(Debug)]
pub struct DetailRequest {
    item_id: String,
    generation: u64,
}

impl DetailRequest {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }
}

/// Fetches and exposes detail for a changing item identity.
pub struct DetailRetriever {
    state: DetailState,
    generation: u64,
}

impl DetailRetriever {
    pub fn new() -> Self {
        Self {
            state: DetailState::Empty,
            generation: 0,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading { .. })
    }

    /// React to a change of the selected identity.
    ///
    /// A `None` identity resets to `Empty` immediately, issuing nothing. A
    /// new identity clears any previously shown detail, transitions to
    /// `Loading` and returns the request to fetch. Either way the generation
    /// advances, so any fetch still outstanding for the previous identity
    /// resolves stale.
    pub fn set_identity(&mut self, id: Option<&str>) -> Option<DetailRequest> {
        self.generation += 1;

        match id {
            None => {
                self.state = DetailState::Empty;
                None
            }
            Some(item_id) => {
                debug!(item_id, generation = self.generation, "Loading product detail");
                self.state = DetailState::Loading {
                    item_id: item_id.to_string(),
                };
                Some(DetailRequest {
                    item_id: item_id.to_string(),
                    generation: self.generation,
                })
            }
        }
    }

    /// Apply the outcome of an issued fetch, unless it has gone stale.
    ///
    /// Returns whether the outcome was applied. A stale outcome (the
    /// identity changed after the fetch was issued) is dropped without
    /// touching the state.
    pub fn complete(&mut self, request: DetailRequest, outcome: Result<ProductDetail>) -> bool {
        if request.generation != self.generation {
            debug!(
                item_id = %request.item_id,
                stale_generation = request.generation,
                current_generation = self.generation,
                "Discarding stale detail response"
            );
            return false;
        }

        self.state = match outcome {
            Ok(detail) => DetailState::Loaded(detail),
            Err(CatalogError::NotFound(_)) => DetailState::NotFound {
                message: NOT_FOUND_MESSAGE.to_string(),
            },
            Err(err) => {
                warn!(item_id = %request.item_id, error = %err, "Detail fetch failed");
                DetailState::NotFound {
                    message: err.to_string(),
                }
            }
        };
        true
    }

    /// Run one full identity change: transition, issue at most one fetch,
    /// apply the outcome.
    pub async fn retrieve(&mut self, api: &dyn CatalogApi, id: Option<&str>) -> &DetailState {
        if let Some(request) = self.set_identity(id) {
            let outcome = api.product_detail(request.item_id()).await;
            self.complete(request, outcome);
        }
        self.state()
    }
}

impl Default for DetailRetriever {
    fn default() -> Self {
        Self::new()
    }
}
