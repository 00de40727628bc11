//! # Inventory Error Types

use rocketshoes_core::ProductId;
use thiserror::Error;

/// Result type alias for inventory queries.
pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service does not know this product.
    #[error("Product {0} not found in inventory")]
    NotFound(ProductId),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("Invalid inventory payload: {0}")]
    InvalidPayload(String),

    /// Base URL could not be used to build request URLs.
    #[error("Invalid inventory URL: {0}")]
    InvalidUrl(String),

    /// The service is not reachable at all.
    #[error("Inventory unavailable: {0}")]
    Unavailable(String),
}
