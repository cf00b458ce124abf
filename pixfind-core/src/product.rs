//! Catalog data model.
//!
//! Wire shapes match the backend exactly (`snake_case` field names); the
//! server is authoritative for validation and ranking, so nothing here is
//! checked beyond what the client itself needs to assemble a request.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::preview::SelectedFile;

/// Language tag applied when wrapping the free-text item name for upload.
pub const DEFAULT_LANGUAGE_TAG: &str = "en";

/// Retrieval backend used to rank results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    #[default]
    CnnFaiss,
    ClipFaiss,
    ClipGeminiChroma,
}

impl SearchMethod {
    /// All methods, in picker order.
    pub const ALL: [SearchMethod; 3] = [
        SearchMethod::CnnFaiss,
        SearchMethod::ClipFaiss,
        SearchMethod::ClipGeminiChroma,
    ];

    /// Wire value sent in the `method` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMethod::CnnFaiss => "cnn_faiss",
            SearchMethod::ClipFaiss => "clip_faiss",
            SearchMethod::ClipGeminiChroma => "clip_gemini_chroma",
        }
    }

    /// Human-readable name for pickers and help text.
    pub fn label(self) -> &'static str {
        match self {
            SearchMethod::CnnFaiss => "CNN + FAISS",
            SearchMethod::ClipFaiss => "CLIP + CHROMA",
            SearchMethod::ClipGeminiChroma => "CLIP + Gemini + CHROMA",
        }
    }
}

impl std::fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchMethod {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        SearchMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| {
                CatalogError::Validation(format!(
                    "unknown search method '{s}' (expected one of: cnn_faiss, clip_faiss, clip_gemini_chroma)"
                ))
            })
    }
}

/// A search request, immutable once dispatched.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub image: SelectedFile,
    pub method: SearchMethod,
    pub top_k: u32,
}

/// One ranked match. Order within a result list is server-determined and
/// preserved verbatim, ties included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub item_id: String,
    pub image_path: String,
    pub score: f32,
}

/// Body of a successful `POST /search/` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// One localized rendering of an item name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub language_tag: String,
    pub value: String,
}

/// Reference to a stored catalog image.
///
/// The main image of a product that predates image ingestion may carry an
/// empty path; consumers render a placeholder for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub image_path: String,
}

/// Full detail record for one catalog item, replaced wholesale on every
/// fetch and never partially mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub item_id: String,
    #[serde(default)]
    pub item_name: Vec<LocalizedName>,
    #[serde(default)]
    pub product_type: Vec<String>,
    pub main_image: ImageRef,
    #[serde(default)]
    pub other_images: Vec<ImageRef>,
}

/// One file attachment of a submission, under its upload filename.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPart {
    /// Filename sent on the wire: `{item_id}_main_{original}` for the main
    /// image, `{item_id}_other_{index}_{original}` for the others.
    pub upload_name: String,
    pub file: SelectedFile,
}

/// Assembled `POST /add_product` request body.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPayload {
    pub item_id: String,
    pub product_type: String,
    pub item_name: Vec<LocalizedName>,
    /// JSON encoding of `item_name`, sent as the `item_name` text field.
    pub item_name_json: String,
    pub main_image: UploadPart,
    pub other_images: Vec<UploadPart>,
}

impl SubmissionPayload {
    /// Assemble a submission from raw form fields and selections.
    ///
    /// Pure: no view state, no I/O. The main image is the only field checked
    /// client-side; everything else passes through for the server to judge.
    pub fn assemble(
        item_id: &str,
        product_type: &str,
        item_name: &str,
        main_image: Option<&SelectedFile>,
        other_images: &[SelectedFile],
    ) -> Result<Self> {
        let main = main_image
            .ok_or_else(|| CatalogError::Validation("Main image is required".to_string()))?;

        let item_name = vec![LocalizedName {
            language_tag: DEFAULT_LANGUAGE_TAG.to_string(),
            value: item_name.to_string(),
        }];
        let item_name_json = serde_json::to_string(&item_name)
            .map_err(|e| CatalogError::Serialization(format!("failed to encode item_name: {e}")))?;

        let main_image = UploadPart {
            upload_name: format!("{}_main_{}", item_id, main.file_name),
            file: main.clone(),
        };
        let other_images = other_images
            .iter()
            .enumerate()
            .map(|(index, file)| UploadPart {
                upload_name: format!("{}_other_{}_{}", item_id, index, file.file_name),
                file: file.clone(),
            })
            .collect();

        Ok(Self {
            item_id: item_id.to_string(),
            product_type: product_type.to_string(),
            item_name,
            item_name_json,
            main_image,
            other_images,
        })
    }
}

/// Success body of `POST /add_product`. All fields tolerated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddProductReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub main_image_id: Option<String>,
    #[serde(default)]
    pub other_image_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[test]
    fn test_method_wire_values() {
        assert_eq!(SearchMethod::CnnFaiss.as_str(), "cnn_faiss");
        assert_eq!(SearchMethod::ClipFaiss.as_str(), "clip_faiss");
        assert_eq!(SearchMethod::ClipGeminiChroma.as_str(), "clip_gemini_chroma");
    }

    #[test]
    fn test_method_round_trips_through_from_str() {
        for method in SearchMethod::ALL {
            assert_eq!(method.as_str().parse::<SearchMethod>().unwrap(), method);
        }
        assert!("clip_gemini_faiss".parse::<SearchMethod>().is_err());
    }

    #[test]
    fn test_method_serde_matches_wire_values() {
        let json = serde_json::to_string(&SearchMethod::ClipGeminiChroma).unwrap();
        assert_eq!(json, "\"clip_gemini_chroma\"");
    }

    #[test]
    fn test_assemble_requires_main_image() {
        let err = SubmissionPayload::assemble("B07X", "SHOES", "Trail runner", None, &[])
            .unwrap_err();
        assert_eq!(err.to_string(), "Main image is required");
    }

    #[test]
    fn test_assemble_wraps_item_name_with_fixed_language_tag() {
        let main = file("front.jpg");
        let payload =
            SubmissionPayload::assemble("B07X", "SHOES", "Trail runner", Some(&main), &[])
                .unwrap();

        assert_eq!(
            payload.item_name,
            vec![LocalizedName {
                language_tag: "en".to_string(),
                value: "Trail runner".to_string(),
            }]
        );
        assert_eq!(
            payload.item_name_json,
            r#"[{"language_tag":"en","value":"Trail runner"}]"#
        );
    }

    #[test]
    fn test_assemble_upload_filename_conventions() {
        let main = file("front.jpg");
        let others = [file("side.jpg"), file("back.jpg")];
        let payload =
            SubmissionPayload::assemble("B07X", "SHOES", "Trail runner", Some(&main), &others)
                .unwrap();

        assert_eq!(payload.main_image.upload_name, "B07X_main_front.jpg");
        assert_eq!(payload.other_images[0].upload_name, "B07X_other_0_side.jpg");
        assert_eq!(payload.other_images[1].upload_name, "B07X_other_1_back.jpg");
    }

    #[test]
    fn test_assemble_passes_other_fields_through_unvalidated() {
        let main = file("front.jpg");
        let payload = SubmissionPayload::assemble("", "", "", Some(&main), &[]).unwrap();
        assert_eq!(payload.item_id, "");
        assert_eq!(payload.product_type, "");
    }

    #[test]
    fn test_product_detail_tolerates_minimal_body() {
        let detail: ProductDetail = serde_json::from_str(
            r#"{"item_id":"B07X","main_image":{"image_id":null,"image_path":""}}"#,
        )
        .unwrap();
        assert_eq!(detail.item_id, "B07X");
        assert!(detail.item_name.is_empty());
        assert!(detail.other_images.is_empty());
        assert_eq!(detail.main_image.image_path, "");
    }
}
