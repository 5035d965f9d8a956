//! Request option merging.
//!
//! Callers hand the invoker a partial [`RequestOptions`]; [`merge`] layers
//! it over the default option set and then applies the configured
//! additional headers. Caller values win over defaults key-by-key inside
//! the map-valued fields; non-map fields (the body) are taken wholesale
//! from the caller when present.

use std::collections::BTreeMap;

use crate::error::YotpoError;

/// Options for a single API request. All fields start empty; the invoker
/// fills in defaults via [`merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl RequestOptions {
    /// Options carrying only a JSON body.
    #[must_use]
    pub fn with_body(body: String) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }
}

/// The header set attached to every request. The empty token header is
/// overwritten by the token-attach step for authenticated calls.
pub(crate) fn default_options() -> RequestOptions {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.insert("X-Yotpo-Token".to_string(), String::new());
    RequestOptions {
        headers,
        query: BTreeMap::new(),
        body: None,
    }
}

/// Merge caller options over defaults, then overlay the additional headers.
///
/// Per-key precedence inside `headers` and `query`: caller wins, defaults
/// fill the gaps. `body` is the caller's when set, otherwise the default's.
/// Additional headers overwrite any same-named header last.
pub(crate) fn merge(
    defaults: &RequestOptions,
    additional_headers: &[(String, String)],
    caller: RequestOptions,
) -> RequestOptions {
    let mut headers = defaults.headers.clone();
    headers.extend(caller.headers);

    let mut query = defaults.query.clone();
    query.extend(caller.query);

    for (name, value) in additional_headers {
        headers.insert(name.clone(), value.clone());
    }

    RequestOptions {
        headers,
        query,
        body: caller.body.or_else(|| defaults.body.clone()),
    }
}

/// Validate raw `name|value` entries into header pairs.
///
/// The config layer already validates entries it loads from the
/// environment; this guards clients constructed with hand-built configs.
pub(crate) fn parse_additional_headers(
    raw: &[String],
) -> Result<Vec<(String, String)>, YotpoError> {
    raw.iter()
        .map(|entry| {
            let (name, value) = entry
                .split_once('|')
                .ok_or_else(|| YotpoError::InvalidHeader(entry.clone()))?;
            if name.is_empty() {
                return Err(YotpoError::InvalidHeader(entry.clone()));
            }
            Ok((name.to_string(), value.to_string()))
        })
        .collect()
}
