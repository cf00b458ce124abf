//! Pixfind Core - client-side workflows for an image-based product catalog
//!
//! This crate implements the browser-facing half of the Pixfind image search
//! service as a reusable library: submit a photo and get visually similar
//! catalog items back, inspect one item's stored images and metadata, and
//! register new items with their own images. The backend (retrieval
//! algorithms, storage, image serving) is an external HTTP collaborator
//! reached through the [`CatalogApi`] trait.
//!
//! # Components
//!
//! - Preview handles ([`PreviewRegistry`], [`PreviewSlot`], [`PreviewSet`]):
//!   deterministic acquisition/release of thumbnail resources for selected
//!   files
//! - [`SearchOrchestrator`]: the search state machine, one in-flight request
//!   at a time
//! - [`DetailRetriever`]: latest-wins detail lookup keyed by the selected
//!   item identity
//! - [`SubmissionController`]: multipart catalog-ingestion flow with
//!   success/failure reconciliation
//!
//! The components are peers: none calls another, a view layer wires them.
//!
//! # Example
//!
//! ```no_run
//! use pixfind_core::{
//!     ClientConfig, HttpCatalogApi, PreviewRegistry, SearchMethod, SearchOrchestrator,
//!     SelectedFile,
//! };
//!
//! # async fn example() -> pixfind_core::Result<()> {
//! let config = ClientConfig::new("http://localhost:5000")?;
//! let api = HttpCatalogApi::new(config)?;
//!
//! let mut previews = PreviewRegistry::new();
//! let mut search = SearchOrchestrator::new();
//! search.set_method(SearchMethod::ClipFaiss);
//! search.select_image(&mut previews, Some(SelectedFile::new("shoe.jpg", vec![])));
//!
//! search.submit(&api).await?;
//! for result in search.results() {
//!     println!("{}  {:.4}", result.item_id, result.score);
//! }
//!
//! search.teardown(&mut previews);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod detail;
pub mod error;
pub mod preview;
pub mod product;
pub mod search;
pub mod submit;

// Re-export main types for convenience
pub use api::{CatalogApi, HttpCatalogApi, MockCatalogApi};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use detail::{DetailRequest, DetailRetriever, DetailState};
pub use error::{CatalogError, Result};
pub use preview::{PreviewHandle, PreviewRegistry, PreviewSet, PreviewSlot, SelectedFile};
pub use product::{
    AddProductReceipt, ImageRef, LocalizedName, ProductDetail, SearchMethod, SearchQuery,
    SearchResult, SubmissionPayload, UploadPart, DEFAULT_LANGUAGE_TAG,
};
pub use search::{PendingSearch, SearchOrchestrator, SearchPhase, DEFAULT_TOP_K};
pub use submit::{AddItemFields, SubmissionController, SubmissionStatus};
