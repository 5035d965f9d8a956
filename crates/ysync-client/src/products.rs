//! Product listing and create-or-update reconciliation.

use std::collections::HashMap;

use reqwest::Method;

use crate::client::{Resource, YotpoClient};
use crate::error::YotpoError;
use crate::options::RequestOptions;
use crate::types::{Product, ProductInput};

impl YotpoClient {
    /// Returns the product index keyed by external id.
    ///
    /// The index is memoized per client instance and rebuilt only when it is
    /// empty or `refresh` is set. Listed products without an `external_id`
    /// are dropped with a warning. The index goes stale the moment a remote
    /// write happens elsewhere; callers that need fresh membership pass
    /// `refresh = true`.
    ///
    /// # Errors
    ///
    /// Propagates any [`YotpoError`] from `GET products`.
    pub async fn products(
        &mut self,
        refresh: bool,
    ) -> Result<HashMap<String, Product>, YotpoError> {
        if self.product_index.is_empty() || refresh {
            let value = self
                .call_api(
                    "products",
                    Method::GET,
                    RequestOptions::default(),
                    true,
                    Resource::Store,
                    None,
                )
                .await?;

            let items = value
                .get("products")
                .and_then(serde_json::Value::as_array)
                .cloned()
                .unwrap_or_default();

            let mut index = HashMap::new();
            for item in items {
                match serde_json::from_value::<Product>(item) {
                    Ok(product) if !product.external_id.is_empty() => {
                        index.insert(product.external_id.clone(), product);
                    }
                    Ok(product) => {
                        tracing::warn!(
                            yotpo_id = ?product.yotpo_id,
                            "skipping product without an external_id"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping malformed product entry");
                    }
                }
            }
            self.product_index = index;
        }
        Ok(self.product_index.clone())
    }

    /// Creates the product remotely, or patches it if its external id is
    /// already known. Returns `true` when a remote write occurred.
    ///
    /// Existence is decided solely by membership in the last-loaded product
    /// index (a listing is triggered if the index is empty). When the
    /// product exists and `allow_update` is false, no request is made.
    ///
    /// # Errors
    ///
    /// Propagates any [`YotpoError`] from the listing, create, or update
    /// call. A failed create performs no follow-up request.
    pub async fn upsert_product(
        &mut self,
        input: &ProductInput,
        allow_update: bool,
    ) -> Result<bool, YotpoError> {
        let index = self.products(false).await?;
        let mut attributes = filtered_attributes(input);

        match index.get(&input.external_id) {
            None => {
                // external_id and sku are sent explicitly on create; sku is
                // null when absent, unlike the filtered attributes.
                attributes.insert(
                    "external_id".to_string(),
                    serde_json::Value::String(input.external_id.clone()),
                );
                attributes.insert(
                    "sku".to_string(),
                    input
                        .sku
                        .clone()
                        .map_or(serde_json::Value::Null, serde_json::Value::String),
                );
                let body = serde_json::json!({ "product": attributes }).to_string();
                self.call_api(
                    "products",
                    Method::POST,
                    RequestOptions::with_body(body),
                    true,
                    Resource::Store,
                    None,
                )
                .await?;
                Ok(true)
            }
            Some(remote) if allow_update => {
                let Some(yotpo_id) = remote.yotpo_id else {
                    tracing::warn!(
                        external_id = %input.external_id,
                        "remote product has no yotpo_id; skipping update"
                    );
                    return Ok(false);
                };
                let body = serde_json::json!({ "product": attributes }).to_string();
                self.call_api(
                    &format!("products/{yotpo_id}"),
                    Method::PATCH,
                    RequestOptions::with_body(body),
                    true,
                    Resource::Store,
                    None,
                )
                .await?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }
}

/// The outgoing `product` attributes: only non-empty fields among name,
/// description, url, and price. This is a filter, not a null-fill.
fn filtered_attributes(input: &ProductInput) -> serde_json::Map<String, serde_json::Value> {
    let mut attributes = serde_json::Map::new();
    for (key, value) in [
        ("name", &input.name),
        ("description", &input.description),
        ("url", &input.url),
        ("price", &input.price),
    ] {
        if let Some(v) = value {
            if !v.is_empty() {
                attributes.insert(key.to_string(), serde_json::Value::String(v.clone()));
            }
        }
    }
    attributes
}
