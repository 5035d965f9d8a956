//! Core request path: credential attach, option merge, dispatch, caching,
//! error mapping, lenient decode.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Method, Url};

use crate::cache::{CacheStore, Clock, MemoryCache, SystemClock};
use crate::error::{ErrorMapper, YotpoError};
use crate::options::{self, RequestOptions};
use crate::types::{AccessTokenResponse, Product};

pub(crate) const TOKEN_HEADER: &str = "X-Yotpo-Token";

const DEFAULT_STORE_BASE_URL: &str = "https://api.yotpo.com/core/v3/stores";
const DEFAULT_REVIEWS_BASE_URL: &str = "https://api.yotpo.com/v1/apps";

/// Which Yotpo API family a call targets. Store-scoped and review-scoped
/// resources live under different base URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resource {
    Store,
    Reviews,
}

/// Cache directives for a single cacheable call.
#[derive(Debug, Clone)]
pub(crate) struct CachePolicy {
    pub key: String,
    pub ttl_secs: i64,
}

/// Connection settings for [`YotpoClient::new`].
#[derive(Debug, Clone)]
pub struct YotpoConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Raw `name|value` entries attached to every request.
    pub additional_headers: Vec<String>,
    pub timeout_secs: u64,
    pub reviews_cache_ttl_secs: i64,
    pub store_base_url: String,
    pub reviews_base_url: String,
}

impl YotpoConfig {
    /// Config pointed at the production Yotpo API with default timeouts.
    #[must_use]
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        Self {
            api_key: api_key.to_owned(),
            api_secret: api_secret.to_owned(),
            additional_headers: Vec::new(),
            timeout_secs: 30,
            reviews_cache_ttl_secs: 300,
            store_base_url: DEFAULT_STORE_BASE_URL.to_owned(),
            reviews_base_url: DEFAULT_REVIEWS_BASE_URL.to_owned(),
        }
    }
}

/// Client for the Yotpo REST API.
///
/// Holds the memoized access token and product index for its own lifetime;
/// both are instance-scoped. The token is obtained lazily on the first
/// authenticated call and never refreshed — if the remote token expires
/// mid-session the next call fails and the caller recreates the client.
/// Methods take `&mut self`: one request is in flight at a time.
pub struct YotpoClient {
    http: Client,
    api_key: String,
    api_secret: String,
    store_base_url: String,
    reviews_base_url: String,
    additional_headers: Vec<(String, String)>,
    default_options: RequestOptions,
    pub(crate) reviews_cache_ttl_secs: i64,
    access_token: Option<String>,
    pub(crate) product_index: HashMap<String, Product>,
    cache: Box<dyn CacheStore + Send>,
    clock: Box<dyn Clock + Send + Sync>,
    map_error: ErrorMapper,
}

impl YotpoClient {
    /// Creates a client from connection settings, with an in-memory cache,
    /// the system clock, and the identity error mapper.
    ///
    /// # Errors
    ///
    /// Returns [`YotpoError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, [`YotpoError::InvalidBaseUrl`] if a base URL
    /// does not parse, or [`YotpoError::InvalidHeader`] on a malformed
    /// additional-header entry.
    pub fn new(config: &YotpoConfig) -> Result<Self, YotpoError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ysync/0.1 (yotpo-sync)")
            .build()?;

        let store_base_url = normalize_base_url(&config.store_base_url)?;
        let reviews_base_url = normalize_base_url(&config.reviews_base_url)?;
        let additional_headers = options::parse_additional_headers(&config.additional_headers)?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            store_base_url,
            reviews_base_url,
            additional_headers,
            default_options: options::default_options(),
            reviews_cache_ttl_secs: config.reviews_cache_ttl_secs,
            access_token: None,
            product_index: HashMap::new(),
            cache: Box::new(MemoryCache::new()),
            clock: Box::new(SystemClock),
            map_error: Box::new(|e| e),
        })
    }

    /// Replaces the cache backend, e.g. with a persistent store whose
    /// entries outlive this client instance.
    #[must_use]
    pub fn with_cache(mut self, cache: Box<dyn CacheStore + Send>) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the time source. Tests pin it to a fixed instant.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    /// Installs a hook translating [`YotpoError::Api`] values into
    /// domain-specific errors before they reach the caller.
    #[must_use]
    pub fn with_error_mapper(mut self, map_error: ErrorMapper) -> Self {
        self.map_error = map_error;
        self
    }

    /// Returns the bearer access token, exchanging the API secret for one on
    /// first use. Memoized for the lifetime of this instance; the second
    /// call makes no network request.
    ///
    /// # Errors
    ///
    /// Propagates any [`YotpoError`] from the token endpoint unchanged.
    pub async fn access_token(&mut self) -> Result<String, YotpoError> {
        if let Some(token) = &self.access_token {
            return Ok(token.clone());
        }
        let body = serde_json::json!({ "secret": self.api_secret }).to_string();
        // Deliberately unauthenticated: this call mints the token.
        let value = self
            .request_raw(
                "access_tokens",
                Method::POST,
                RequestOptions::with_body(body),
                Resource::Store,
                None,
            )
            .await?;
        let parsed: AccessTokenResponse = serde_json::from_value(value).unwrap_or_default();
        self.access_token = Some(parsed.access_token.clone());
        Ok(parsed.access_token)
    }

    /// Issues an API call, attaching the access token when `use_token`.
    pub(crate) async fn call_api(
        &mut self,
        endpoint: &str,
        method: Method,
        mut options: RequestOptions,
        use_token: bool,
        resource: Resource,
        cache: Option<CachePolicy>,
    ) -> Result<serde_json::Value, YotpoError> {
        if use_token {
            let token = self.access_token().await?;
            options.headers.insert(TOKEN_HEADER.to_string(), token);
        }
        self.request_raw(endpoint, method, options, resource, cache)
            .await
    }

    /// The unauthenticated request path: cache check, option merge,
    /// dispatch, write-through caching, error mapping, lenient decode.
    async fn request_raw(
        &mut self,
        endpoint: &str,
        method: Method,
        options: RequestOptions,
        resource: Resource,
        cache: Option<CachePolicy>,
    ) -> Result<serde_json::Value, YotpoError> {
        if let Some(policy) = &cache {
            if let Some(entry) = self.cache.get(&policy.key) {
                if !entry.payload.is_empty() && self.clock.now_epoch() < entry.expires_at {
                    tracing::debug!(endpoint, key = %policy.key, "serving cached response");
                    return Ok(decode_lenient(&entry.payload));
                }
            }
        }

        let options = options::merge(&self.default_options, &self.additional_headers, options);
        let url = self.endpoint_url(resource, endpoint);

        let mut request = self.http.request(method, url.as_str());
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(endpoint, error = %e, "Yotpo request failed");
                return Err(YotpoError::Http(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let error = (self.map_error)(YotpoError::Api {
                endpoint: endpoint.to_string(),
                status,
                body: decode_lenient(&error_body),
            });
            tracing::error!(endpoint, error = %error, "Yotpo request failed");
            return Err(error);
        }

        let body = response.text().await?;
        if let Some(policy) = &cache {
            let expires_at = self.clock.now_epoch() + policy.ttl_secs;
            self.cache.set(&policy.key, &body, expires_at);
        }
        Ok(decode_lenient(&body))
    }

    /// `{base(resource)}/{api_key}/{endpoint}`.
    fn endpoint_url(&self, resource: Resource, endpoint: &str) -> String {
        let base = match resource {
            Resource::Store => &self.store_base_url,
            Resource::Reviews => &self.reviews_base_url,
        };
        format!("{base}/{}/{endpoint}", self.api_key)
    }
}

/// Validates a base URL and strips any trailing slash so path joining is
/// uniform.
fn normalize_base_url(raw: &str) -> Result<String, YotpoError> {
    let trimmed = raw.trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| YotpoError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(trimmed.to_string())
}

/// Decodes a response body as JSON, treating an empty, invalid, or `null`
/// body as an empty object. Callers read an empty result as "nothing
/// found", never as a failure.
fn decode_lenient(body: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Null) | Err(_) => {
            serde_json::Value::Object(serde_json::Map::new())
        }
        Ok(value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(store_base: &str) -> YotpoClient {
        let mut config = YotpoConfig::new("test-key", "test-secret");
        config.store_base_url = store_base.to_string();
        YotpoClient::new(&config).expect("client construction should not fail")
    }

    #[test]
    fn endpoint_url_joins_base_key_and_endpoint() {
        let client = test_client("https://api.yotpo.com/core/v3/stores");
        assert_eq!(
            client.endpoint_url(Resource::Store, "products"),
            "https://api.yotpo.com/core/v3/stores/test-key/products"
        );
    }

    #[test]
    fn endpoint_url_strips_trailing_slash_from_base() {
        let client = test_client("https://api.yotpo.com/core/v3/stores/");
        assert_eq!(
            client.endpoint_url(Resource::Store, "access_tokens"),
            "https://api.yotpo.com/core/v3/stores/test-key/access_tokens"
        );
    }

    #[test]
    fn endpoint_url_selects_reviews_base() {
        let client = test_client("https://api.yotpo.com/core/v3/stores");
        assert_eq!(
            client.endpoint_url(Resource::Reviews, "bottom_lines"),
            "https://api.yotpo.com/v1/apps/test-key/bottom_lines"
        );
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let mut config = YotpoConfig::new("test-key", "test-secret");
        config.store_base_url = "not a url".to_string();
        let result = YotpoClient::new(&config);
        assert!(
            matches!(result, Err(YotpoError::InvalidBaseUrl { .. })),
            "expected InvalidBaseUrl"
        );
    }

    #[test]
    fn new_rejects_malformed_additional_header() {
        let mut config = YotpoConfig::new("test-key", "test-secret");
        config.additional_headers = vec!["NoSeparator".to_string()];
        let result = YotpoClient::new(&config);
        assert!(
            matches!(result, Err(YotpoError::InvalidHeader(ref e)) if e == "NoSeparator"),
            "expected InvalidHeader"
        );
    }

    #[test]
    fn decode_lenient_parses_valid_json() {
        let value = decode_lenient(r#"{"a": 1}"#);
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn decode_lenient_maps_garbage_to_empty_object() {
        let value = decode_lenient("<html>not json</html>");
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn decode_lenient_maps_empty_body_to_empty_object() {
        assert_eq!(decode_lenient(""), serde_json::json!({}));
    }

    #[test]
    fn decode_lenient_maps_null_to_empty_object() {
        assert_eq!(decode_lenient("null"), serde_json::json!({}));
    }
}
