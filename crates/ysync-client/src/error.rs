use thiserror::Error;

/// Errors returned by the Yotpo API client.
#[derive(Debug, Error)]
pub enum YotpoError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Yotpo API answered with an error status. `body` carries the
    /// decoded error payload (an empty object when the body was not JSON).
    #[error("Yotpo API error on {endpoint}: HTTP {status}")]
    Api {
        endpoint: String,
        status: reqwest::StatusCode,
        body: serde_json::Value,
    },

    /// An additional-header entry is not in `name|value` form.
    #[error("invalid additional header entry: {0}")]
    InvalidHeader(String),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Hook for translating an API error into a domain-specific error before it
/// is returned to the caller. Receives [`YotpoError::Api`] values only;
/// transport errors pass through untouched. The default is identity.
pub type ErrorMapper = Box<dyn Fn(YotpoError) -> YotpoError + Send + Sync>;
