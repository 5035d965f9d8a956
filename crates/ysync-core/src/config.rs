use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_key = require("YOTPO_API_KEY")?;
    let api_secret = require("YOTPO_API_SECRET")?;

    let env = parse_environment(&or_default("YSYNC_ENV", "development"));
    let log_level = or_default("YSYNC_LOG_LEVEL", "info");

    let additional_headers = match lookup("YOTPO_ADDITIONAL_HEADERS") {
        Ok(raw) => parse_additional_headers(&raw)?,
        Err(_) => Vec::new(),
    };

    let request_timeout_secs = parse_u64("YOTPO_REQUEST_TIMEOUT_SECS", "30")?;
    let reviews_cache_ttl_secs = parse_i64("YOTPO_REVIEWS_CACHE_TTL_SECS", "300")?;

    let store_base_url = or_default(
        "YOTPO_STORE_BASE_URL",
        "https://api.yotpo.com/core/v3/stores",
    );
    let reviews_base_url = or_default("YOTPO_REVIEWS_BASE_URL", "https://api.yotpo.com/v1/apps");

    Ok(AppConfig {
        env,
        log_level,
        api_key,
        api_secret,
        additional_headers,
        request_timeout_secs,
        reviews_cache_ttl_secs,
        store_base_url,
        reviews_base_url,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Parse a comma-separated list of `name|value` header entries.
///
/// Entries without a `|` separator or with an empty header name are rejected
/// so a bad deployment fails at startup instead of producing malformed
/// requests later. Entries are kept in their raw `name|value` form; the
/// client crate splits them when building requests.
fn parse_additional_headers(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut headers = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((name, _)) = entry.split_once('|') else {
            return Err(ConfigError::InvalidEnvVar {
                var: "YOTPO_ADDITIONAL_HEADERS".to_string(),
                reason: format!("entry '{entry}' is missing the '|' separator"),
            });
        };
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: "YOTPO_ADDITIONAL_HEADERS".to_string(),
                reason: format!("entry '{entry}' has an empty header name"),
            });
        }
        headers.push(entry.to_string());
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("YOTPO_API_KEY", "test-app-key");
        m.insert("YOTPO_API_SECRET", "test-app-secret");
        m
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_fails_without_api_key() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "YOTPO_API_KEY"),
            "expected MissingEnvVar(YOTPO_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_api_secret() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("YOTPO_API_KEY", "test-app-key");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "YOTPO_API_SECRET"),
            "expected MissingEnvVar(YOTPO_API_SECRET), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_all_required_vars() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.api_key, "test-app-key");
        assert_eq!(cfg.api_secret, "test-app-secret");
        assert!(cfg.additional_headers.is_empty());
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.reviews_cache_ttl_secs, 300);
        assert_eq!(cfg.store_base_url, "https://api.yotpo.com/core/v3/stores");
        assert_eq!(cfg.reviews_base_url, "https://api.yotpo.com/v1/apps");
    }

    #[test]
    fn build_app_config_timeout_override() {
        let mut map = full_env();
        map.insert("YOTPO_REQUEST_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 60);
    }

    #[test]
    fn build_app_config_timeout_invalid() {
        let mut map = full_env();
        map.insert("YOTPO_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YOTPO_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(YOTPO_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_reviews_ttl_override() {
        let mut map = full_env();
        map.insert("YOTPO_REVIEWS_CACHE_TTL_SECS", "900");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.reviews_cache_ttl_secs, 900);
    }

    #[test]
    fn parse_additional_headers_keeps_valid_entries_raw() {
        let headers = parse_additional_headers("X-Proxy-Auth|abc123").unwrap();
        assert_eq!(headers, vec!["X-Proxy-Auth|abc123".to_string()]);
    }

    #[test]
    fn parse_additional_headers_multiple_entries() {
        let headers =
            parse_additional_headers("X-Proxy-Auth|abc123, X-Trace-Id|run-7").unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[1], "X-Trace-Id|run-7");
    }

    #[test]
    fn parse_additional_headers_skips_empty_entries() {
        let headers = parse_additional_headers("X-Proxy-Auth|abc123,,").unwrap();
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn parse_additional_headers_rejects_missing_separator() {
        let result = parse_additional_headers("X-Proxy-Auth abc123");
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YOTPO_ADDITIONAL_HEADERS"),
            "expected InvalidEnvVar(YOTPO_ADDITIONAL_HEADERS), got: {result:?}"
        );
    }

    #[test]
    fn parse_additional_headers_rejects_empty_name() {
        let result = parse_additional_headers("|abc123");
        assert!(result.is_err(), "expected Err, got: {result:?}");
    }

    #[test]
    fn parse_additional_headers_keeps_pipes_in_value() {
        // Only the first '|' separates name from value.
        let headers = parse_additional_headers("X-Flags|a|b").unwrap();
        assert_eq!(headers, vec!["X-Flags|a|b".to_string()]);
    }
}
