//! Yotpo API request/response types.
//!
//! Remote shapes are deserialized leniently: optional fields default and
//! unmodeled platform fields are kept in `extra` via `#[serde(flatten)]`.

use serde::{Deserialize, Serialize};

/// Response of `POST access_tokens`. A missing `access_token` field decodes
/// to the empty string rather than an error.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AccessTokenResponse {
    #[serde(default)]
    pub access_token: String,
}

/// A product as returned by `GET products`.
///
/// `external_id` is the caller-supplied cross-system key; `yotpo_id` is the
/// remote-assigned identifier used for update calls and is only present
/// once the product has been synced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub yotpo_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    /// Remaining platform fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Local product fields for a create-or-update call.
///
/// Empty or absent `name`/`description`/`url`/`price` are omitted from the
/// outgoing payload entirely; `sku` is always sent on create, null when
/// absent.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub external_id: String,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub price: Option<String>,
}

/// An aggregated review summary ("bottom line") for one storefront domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottomLine {
    pub domain_key: String,
    #[serde(default)]
    pub total_reviews: Option<i64>,
    #[serde(default)]
    pub product_score: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
