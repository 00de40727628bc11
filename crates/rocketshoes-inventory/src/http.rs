//! # HTTP Inventory Client
//!
//! Talks to the storefront API:
//!
//! | Query        | Request                  | Response body                 |
//! |--------------|--------------------------|-------------------------------|
//! | `stock`      | `GET {base}/stock/{id}`  | `{"id": 1, "amount": 3}`      |
//! | `product`    | `GET {base}/products/{id}` | `{"id": 1, "title": ..., ...}` |
//!
//! A 404 maps to [`InventoryError::NotFound`]; any other non-2xx status to
//! [`InventoryError::Api`].

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use rocketshoes_core::{Metadata, ProductDetails, ProductId, StockInfo};

use crate::error::{InventoryError, InventoryResult};
use crate::InventoryService;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpInventory {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct StockPayload {
    amount: i64,
}

impl HttpInventory {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is not http(s) or the HTTP client fails to
    /// build.
    pub fn new(base_url: &str, timeout: Duration) -> InventoryResult<Self> {
        let base_url = normalize_base(base_url)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rocketshoes-cart/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpInventory { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, id: ProductId) -> InventoryResult<Url> {
        self.base_url
            .join(&format!("{}/{}", resource, id))
            .map_err(|e| InventoryError::InvalidUrl(e.to_string()))
    }

    async fn fetch(&self, resource: &str, id: ProductId) -> InventoryResult<String> {
        let url = self.endpoint(resource, id)?;
        debug!(%url, "Inventory request");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(id));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), resource, product_id = %id, "Inventory API error");
            return Err(InventoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

impl InventoryService for HttpInventory {
    async fn stock(&self, id: ProductId) -> InventoryResult<StockInfo> {
        let body = self.fetch("stock", id).await?;
        parse_stock(id, &body)
    }

    async fn product(&self, id: ProductId) -> InventoryResult<ProductDetails> {
        let body = self.fetch("products", id).await?;
        parse_product(id, &body)
    }
}

/// Ensures the base URL is http(s) and ends with `/` so `join` appends.
fn normalize_base(raw: &str) -> InventoryResult<Url> {
    let mut url = Url::parse(raw).map_err(|e| InventoryError::InvalidUrl(format!("{raw}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(InventoryError::InvalidUrl(format!(
            "{raw}: scheme must be http or https"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// The id in the body is ignored; the requested id is authoritative.
fn parse_stock(id: ProductId, body: &str) -> InventoryResult<StockInfo> {
    let payload: StockPayload = serde_json::from_str(body)
        .map_err(|e| InventoryError::InvalidPayload(format!("stock {id}: {e}")))?;
    Ok(StockInfo::new(id, payload.amount))
}

fn parse_product(id: ProductId, body: &str) -> InventoryResult<ProductDetails> {
    let mut metadata: Metadata = serde_json::from_str(body)
        .map_err(|e| InventoryError::InvalidPayload(format!("product {id}: {e}")))?;
    metadata.remove("id");
    Ok(ProductDetails { id, metadata })
}
