//! Catalog-ingestion submission workflow.
//!
//! Owns the add-item form: scalar fields, the required main image, optional
//! other images, their preview acquisitions, and the submission status. The
//! flow mirrors the search orchestrator's two-phase shape: [`SubmissionController::begin`]
//! validates and assembles the payload, [`SubmissionController::finish`]
//! reconciles the outcome, [`SubmissionController::submit`] composes the two
//! around a single upload request.

use tracing::{debug, warn};

use crate::api::CatalogApi;
use crate::error::{CatalogError, Result};
use crate::preview::{PreviewRegistry, PreviewSet, PreviewSlot, SelectedFile};
use crate::product::{AddProductReceipt, SubmissionPayload};

const UPLOADING_MESSAGE: &str = "Uploading...";
const SUCCESS_MESSAGE: &str = "Product added successfully!";

/// Scalar form fields, passed through to the server unvalidated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddItemFields {
    pub item_id: String,
    pub product_type: String,
    pub item_name: String,
}

/// User-visible submission status.
///
/// `Uploading` is a distinct non-empty, non-error value so the view can
/// disable re-submission while the request is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Uploading,
    Succeeded(String),
    Failed(String),
}

impl SubmissionStatus {
    /// The status line the view renders.
    pub fn message(&self) -> &str {
        match self {
            SubmissionStatus::Idle => "",
            SubmissionStatus::Uploading => UPLOADING_MESSAGE,
            SubmissionStatus::Succeeded(message) | SubmissionStatus::Failed(message) => message,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, SubmissionStatus::Uploading)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SubmissionStatus::Failed(_))
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Drives the "register a new catalog item" flow.
pub struct SubmissionController {
    fields: AddItemFields,
    main_image: Option<SelectedFile>,
    other_images: Vec<SelectedFile>,
    main_preview: PreviewSlot,
    other_previews: PreviewSet,
    status: SubmissionStatus,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self {
            fields: AddItemFields::default(),
            main_image: None,
            other_images: Vec::new(),
            main_preview: PreviewSlot::new(),
            other_previews: PreviewSet::new(),
            status: SubmissionStatus::Idle,
        }
    }

    pub fn fields(&self) -> &AddItemFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut AddItemFields {
        &mut self.fields
    }

    /// Replace the main image selection, swapping its preview.
    pub fn select_main_image(
        &mut self,
        registry: &mut PreviewRegistry,
        file: Option<SelectedFile>,
    ) {
        self.main_preview.replace(registry, file.as_ref());
        self.main_image = file;
    }

    /// Replace the other-images selection set, swapping all previews.
    pub fn select_other_images(
        &mut self,
        registry: &mut PreviewRegistry,
        files: Vec<SelectedFile>,
    ) {
        self.other_previews.replace(registry, &files);
        self.other_images = files;
    }

    pub fn main_image(&self) -> Option<&SelectedFile> {
        self.main_image.as_ref()
    }

    pub fn other_images(&self) -> &[SelectedFile] {
        &self.other_images
    }

    pub fn main_preview(&self) -> &PreviewSlot {
        &self.main_preview
    }

    pub fn other_previews(&self) -> &PreviewSet {
        &self.other_previews
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Validate the form and assemble the upload payload.
    ///
    /// A missing main image fails here, before any network activity, and the
    /// message is surfaced through the status. On success the status reads
    /// "Uploading..." until [`SubmissionController::finish`] runs.
    pub fn begin(&mut self) -> Result<SubmissionPayload> {
        if self.status.is_uploading() {
            warn!("Submission attempted while an upload is in flight");
            return Err(CatalogError::Validation(
                "an upload is already in flight".to_string(),
            ));
        }

        let payload = match SubmissionPayload::assemble(
            &self.fields.item_id,
            &self.fields.product_type,
            &self.fields.item_name,
            self.main_image.as_ref(),
            &self.other_images,
        ) {
            Ok(payload) => payload,
            Err(err) => {
                self.status = SubmissionStatus::Failed(err.to_string());
                return Err(err);
            }
        };

        debug!(item_id = %payload.item_id, "Submission payload assembled");
        self.status = SubmissionStatus::Uploading;
        Ok(payload)
    }

    /// Reconcile the upload outcome.
    ///
    /// Success resets every field and selection and releases both preview
    /// acquisitions; failure preserves the form exactly as entered and sets
    /// a status carrying the server's detail when it provided one.
    pub fn finish(
        &mut self,
        registry: &mut PreviewRegistry,
        outcome: &Result<AddProductReceipt>,
    ) {
        match outcome {
            Ok(receipt) => {
                debug!(item_id = ?receipt.item_id, "Product registered");
                self.fields = AddItemFields::default();
                self.main_image = None;
                self.other_images.clear();
                self.main_preview.clear(registry);
                self.other_previews.clear(registry);
                self.status = SubmissionStatus::Succeeded(SUCCESS_MESSAGE.to_string());
            }
            Err(err) => {
                warn!(error = %err, "Product registration failed");
                self.status = SubmissionStatus::Failed(failure_message(err));
            }
        }
    }

    /// Run one full submission: validate, issue exactly one upload request,
    /// reconcile.
    pub async fn submit(
        &mut self,
        registry: &mut PreviewRegistry,
        api: &dyn CatalogApi,
    ) -> Result<AddProductReceipt> {
        let payload = self.begin()?;
        let outcome = api.add_product(&payload).await;
        self.finish(registry, &outcome);
        outcome
    }

    /// Teardown path for the owning view; releases all preview acquisitions.
    pub fn teardown(&mut self, registry: &mut PreviewRegistry) {
        self.main_preview.clear(registry);
        self.other_previews.clear(registry);
    }
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self::new()
    }
}

/// Status text for a failed upload. Server-provided detail is quoted when
/// present; transport failures are worded distinctly from rejections.
fn failure_message(err: &CatalogError) -> String {
    match err {
        CatalogError::Server {
            detail: Some(detail),
            ..
        } => format!("Error: {detail}"),
        CatalogError::Server { status, .. } => {
            format!("Error: the server rejected the upload (status {status})")
        }
        CatalogError::Network(cause) => format!("Network error: {cause}"),
        other => format!("Error: {other}"),
    }
}
