#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Application configuration, sourced from environment variables.
///
/// `additional_headers` holds `name|value` entries, validated at load time,
/// that are attached to every outgoing Yotpo request.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub api_key: String,
    pub api_secret: String,
    pub additional_headers: Vec<String>,
    pub request_timeout_secs: u64,
    pub reviews_cache_ttl_secs: i64,
    pub store_base_url: String,
    pub reviews_base_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_key", &"[redacted]")
            .field("api_secret", &"[redacted]")
            .field("additional_headers", &self.additional_headers.len())
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("reviews_cache_ttl_secs", &self.reviews_cache_ttl_secs)
            .field("store_base_url", &self.store_base_url)
            .field("reviews_base_url", &self.reviews_base_url)
            .finish()
    }
}
