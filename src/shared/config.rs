//! Environment-driven configuration
//!
//! Every value has a default so the catalog runs with an empty environment.
//! Provider ordering lives here rather than in code: the preference and
//! fallback lists are tuning knobs for specific upstream services.

use std::time::Duration;

use crate::modules::provider::infrastructure::adapters::{
    anify::DEFAULT_ANIFY_URL, anilist::DEFAULT_ANILIST_URL, consumet::DEFAULT_CONSUMET_URL,
    jikan::DEFAULT_JIKAN_URL,
};
use crate::shared::errors::{AppError, AppResult};

const DEFAULT_STREAMING_SOURCE: &str = "gogoanime";
const DEFAULT_EPISODE_PREFERENCE: &str = "gogoanime,zoro,animepahe";
const DEFAULT_EPISODE_FALLBACK: &str = "jikan";

/// One streaming-link upstream, queried by slug or episode id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingSourceConfig {
    pub name: String,
    pub base_url: String,
}

/// Outbound request policy shared by every upstream client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            max_retries: 2,
            backoff: Duration::from_millis(1_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub anilist_url: String,
    pub jikan_url: String,
    pub episode_api_url: String,
    pub streaming_providers: Vec<StreamingSourceConfig>,
    /// Sub-provider preference used when reconciling episode lists
    pub episode_preference: Vec<String>,
    /// Secondary episode sources tried when the primary returns nothing
    pub episode_fallback_order: Vec<String>,
    pub search_cache_ttl: Duration,
    pub episode_cache_ttl: Duration,
    pub fetch: FetchSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            anilist_url: DEFAULT_ANILIST_URL.to_string(),
            jikan_url: DEFAULT_JIKAN_URL.to_string(),
            episode_api_url: DEFAULT_ANIFY_URL.to_string(),
            streaming_providers: vec![StreamingSourceConfig {
                name: DEFAULT_STREAMING_SOURCE.to_string(),
                base_url: DEFAULT_CONSUMET_URL.to_string(),
            }],
            episode_preference: parse_list(DEFAULT_EPISODE_PREFERENCE),
            episode_fallback_order: parse_list(DEFAULT_EPISODE_FALLBACK),
            search_cache_ttl: Duration::from_secs(300),
            episode_cache_ttl: Duration::from_secs(180),
            fetch: FetchSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment (and `.env`, if present)
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let streaming_providers = match get("STREAMING_PROVIDERS") {
            Some(raw) => parse_streaming_providers(&raw)?,
            None => defaults.streaming_providers,
        };

        let fetch = FetchSettings {
            timeout: get("FETCH_TIMEOUT_MS")
                .map(|raw| parse_number("FETCH_TIMEOUT_MS", &raw).map(Duration::from_millis))
                .transpose()?
                .unwrap_or(defaults.fetch.timeout),
            max_retries: get("FETCH_MAX_RETRIES")
                .map(|raw| parse_retries(&raw))
                .transpose()?
                .unwrap_or(defaults.fetch.max_retries),
            backoff: get("FETCH_BACKOFF_MS")
                .map(|raw| parse_number("FETCH_BACKOFF_MS", &raw).map(Duration::from_millis))
                .transpose()?
                .unwrap_or(defaults.fetch.backoff),
        };

        Ok(Self {
            anilist_url: get("ANILIST_API_URL").unwrap_or(defaults.anilist_url),
            jikan_url: get("JIKAN_API_URL").unwrap_or(defaults.jikan_url),
            episode_api_url: get("EPISODE_API_URL").unwrap_or(defaults.episode_api_url),
            streaming_providers,
            episode_preference: get("EPISODE_PROVIDER_PREFERENCE")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.episode_preference),
            episode_fallback_order: get("EPISODE_FALLBACK_ORDER")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.episode_fallback_order),
            search_cache_ttl: get("SEARCH_CACHE_TTL_SECS")
                .map(|raw| parse_number("SEARCH_CACHE_TTL_SECS", &raw).map(Duration::from_secs))
                .transpose()?
                .unwrap_or(defaults.search_cache_ttl),
            episode_cache_ttl: get("EPISODE_CACHE_TTL_SECS")
                .map(|raw| parse_number("EPISODE_CACHE_TTL_SECS", &raw).map(Duration::from_secs))
                .transpose()?
                .unwrap_or(defaults.episode_cache_ttl),
            fetch,
        })
    }
}

fn parse_number(key: &str, raw: &str) -> AppResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| AppError::ConfigError(format!("{} must be a non-negative integer: {}", key, e)))
}

fn parse_retries(raw: &str) -> AppResult<u32> {
    let n = parse_number("FETCH_MAX_RETRIES", raw)?;
    u32::try_from(n).map_err(|_| {
        AppError::ConfigError(format!("FETCH_MAX_RETRIES is out of range: {}", n))
    })
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_streaming_providers(raw: &str) -> AppResult<Vec<StreamingSourceConfig>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, url) = entry.split_once('=').ok_or_else(|| {
                AppError::ConfigError(format!(
                    "STREAMING_PROVIDERS entry '{}' must look like name=url",
                    entry
                ))
            })?;
            let name = name.trim().to_lowercase();
            let base_url = url.trim().trim_end_matches('/').to_string();
            if name.is_empty() || base_url.is_empty() {
                return Err(AppError::ConfigError(format!(
                    "STREAMING_PROVIDERS entry '{}' has an empty name or url",
                    entry
                )));
            }
            Ok(StreamingSourceConfig { name, base_url })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_empty_environment() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.search_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.episode_cache_ttl, Duration::from_secs(180));
        assert_eq!(config.streaming_providers[0].name, "gogoanime");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("FETCH_MAX_RETRIES", "4"),
            ("FETCH_BACKOFF_MS", "250"),
            ("EPISODE_PROVIDER_PREFERENCE", "Zoro, gogoanime"),
            ("STREAMING_PROVIDERS", "zoro=http://localhost:3000/zoro/, gogo=http://x"),
        ]))
        .unwrap();

        assert_eq!(config.fetch.max_retries, 4);
        assert_eq!(config.fetch.backoff, Duration::from_millis(250));
        assert_eq!(config.episode_preference, vec!["zoro", "gogoanime"]);
        assert_eq!(config.streaming_providers.len(), 2);
        assert_eq!(
            config.streaming_providers[0].base_url,
            "http://localhost:3000/zoro"
        );
    }

    #[test]
    fn test_malformed_number_is_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("FETCH_TIMEOUT_MS", "soon")]));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_oversized_retry_count_is_config_error() {
        let result =
            AppConfig::from_lookup(lookup_from(&[("FETCH_MAX_RETRIES", "4294967297")]));
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        let config =
            AppConfig::from_lookup(lookup_from(&[("FETCH_MAX_RETRIES", "4294967295")])).unwrap();
        assert_eq!(config.fetch.max_retries, u32::MAX);
    }

    #[test]
    fn test_default_urls_match_adapter_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.anilist_url, DEFAULT_ANILIST_URL);
        assert_eq!(config.jikan_url, DEFAULT_JIKAN_URL);
        assert_eq!(config.episode_api_url, DEFAULT_ANIFY_URL);
        assert_eq!(config.streaming_providers.len(), 1);
        assert_eq!(config.streaming_providers[0].base_url, DEFAULT_CONSUMET_URL);
    }

    #[test]
    fn test_malformed_streaming_entry_is_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("STREAMING_PROVIDERS", "gogoanime")]));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
