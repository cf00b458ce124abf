//! Exit codes following sysexits.h conventions.
//!
//! These codes give scripts and CI systems a way to distinguish failure
//! modes without parsing error text.

#![allow(dead_code)] // The full set is documented in --help even where unused

use pixfind_core::CatalogError;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Invalid user input (missing image, unknown method).
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: i32 = 64;

/// The looked-up item does not exist.
/// Maps to EX_DATAERR from sysexits.h.
pub const DATA_ERROR: i32 = 65;

/// Cannot open an input file.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// Backend unreachable or request rejected.
/// Maps to EX_UNAVAILABLE from sysexits.h.
pub const NETWORK_ERROR: i32 = 69;

/// I/O error (cannot write an output file).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Map an error to its exit code.
///
/// Typed catalog errors are matched directly; everything else is classified
/// by inspecting the rendered context chain.
pub fn classify(err: &anyhow::Error) -> i32 {
    if let Some(catalog_err) = err.downcast_ref::<CatalogError>() {
        return match catalog_err {
            CatalogError::Validation(_) => USAGE_ERROR,
            CatalogError::NotFound(_) => DATA_ERROR,
            CatalogError::Network(_) | CatalogError::Server { .. } => NETWORK_ERROR,
            CatalogError::Serialization(_) => GENERAL_ERROR,
        };
    }

    let message = format!("{err:#}");
    if message.contains("Failed to read") {
        INPUT_ERROR
    } else if message.contains("Failed to write") || message.contains("Failed to download") {
        IO_ERROR
    } else if message.contains("not found") {
        DATA_ERROR
    } else if message.contains("network error") {
        NETWORK_ERROR
    } else {
        GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_errors_map_directly() {
        let err = anyhow::Error::new(CatalogError::Validation("Main image is required".into()));
        assert_eq!(classify(&err), USAGE_ERROR);

        let err = anyhow::Error::new(CatalogError::NotFound("B07X".into()));
        assert_eq!(classify(&err), DATA_ERROR);

        let err = anyhow::Error::new(CatalogError::Network("connection refused".into()));
        assert_eq!(classify(&err), NETWORK_ERROR);

        let err = anyhow::Error::new(CatalogError::Server {
            status: 500,
            detail: None,
        });
        assert_eq!(classify(&err), NETWORK_ERROR);
    }

    #[test]
    fn test_typed_errors_map_through_context_chains() {
        let err = anyhow::Error::new(CatalogError::NotFound("B07X".into()))
            .context("Detail lookup failed");
        assert_eq!(classify(&err), DATA_ERROR);
    }

    #[test]
    fn test_untyped_errors_fall_back_to_message_inspection() {
        let err = anyhow::anyhow!("Failed to read image file: query.jpg");
        assert_eq!(classify(&err), INPUT_ERROR);

        let err = anyhow::anyhow!("Product not found (B07X)");
        assert_eq!(classify(&err), DATA_ERROR);

        let err = anyhow::anyhow!("something unexpected");
        assert_eq!(classify(&err), GENERAL_ERROR);
    }
}
