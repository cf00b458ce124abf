use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected the request (status {status}): {}", .detail.as_deref().unwrap_or("no detail provided"))]
    Server { status: u16, detail: Option<String> },

    #[error("product not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
