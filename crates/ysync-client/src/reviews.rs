//! Review bottom-line aggregation with pagination-until-empty.

use std::collections::HashMap;

use reqwest::Method;

use crate::client::{CachePolicy, Resource, YotpoClient};
use crate::error::YotpoError;
use crate::options::RequestOptions;
use crate::types::BottomLine;

const PAGE_SIZE: u32 = 100;
const CACHE_KEY_PREFIX: &str = "yotpo_reviews_p";

impl YotpoClient {
    /// Fetches all review bottom lines, keyed by domain key.
    ///
    /// Pages through `GET bottom_lines` from page 1 until a page yields no
    /// items; a later item overwrites an earlier one sharing the same key.
    /// Each page is cached independently under `yotpo_reviews_p{page}` for
    /// the configured reviews TTL, so repeat calls within the window issue
    /// no network requests. The index is rebuilt fully on every call.
    ///
    /// # Errors
    ///
    /// Propagates any [`YotpoError`] from a page fetch; no partial index is
    /// returned on failure.
    pub async fn bottom_lines(&mut self) -> Result<HashMap<String, BottomLine>, YotpoError> {
        let mut index = HashMap::new();
        let mut page = 1u32;
        loop {
            let mut options = RequestOptions::default();
            options
                .query
                .insert("count".to_string(), PAGE_SIZE.to_string());
            options.query.insert("page".to_string(), page.to_string());

            let policy = CachePolicy {
                key: format!("{CACHE_KEY_PREFIX}{page}"),
                ttl_secs: self.reviews_cache_ttl_secs,
            };
            let value = self
                .call_api(
                    "bottom_lines",
                    Method::GET,
                    options,
                    false,
                    Resource::Reviews,
                    Some(policy),
                )
                .await?;

            let items = value
                .pointer("/response/bottomlines")
                .and_then(serde_json::Value::as_array)
                .cloned()
                .unwrap_or_default();
            if items.is_empty() {
                break;
            }

            for item in items {
                match serde_json::from_value::<BottomLine>(item) {
                    Ok(line) => {
                        index.insert(line.domain_key.clone(), line);
                    }
                    Err(e) => {
                        tracing::warn!(page, error = %e, "skipping malformed bottom line");
                    }
                }
            }
            page += 1;
        }
        Ok(index)
    }
}
