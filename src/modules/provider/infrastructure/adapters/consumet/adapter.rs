use async_trait::async_trait;
use serde_json::Value;

use crate::{
    modules::provider::{
        domain::{
            entities::stream_link::{StreamLink, StreamRequest},
            repositories::StreamingProviderRepository,
        },
        infrastructure::{
            adapters::field_aliases::{first_array, first_bool, first_string},
            http_client::RateLimitClient,
        },
    },
    shared::{
        config::FetchSettings,
        errors::{AppError, AppResult},
    },
};

pub const DEFAULT_CONSUMET_URL: &str = "https://api.consumet.org/anime/gogoanime";

const SOURCE_LIST_FIELDS: &[&str] = &["sources", "links"];
const URL_FIELDS: &[&str] = &["url", "file", "src"];
const QUALITY_FIELDS: &[&str] = &["quality", "label"];
const M3U8_FIELDS: &[&str] = &["isM3U8", "is_m3u8"];

/// One streaming-link source speaking the Consumet watch API.
///
/// Several instances usually exist, one per configured provider route.
pub struct ConsumetAdapter {
    name: String,
    http_client: RateLimitClient,
    base_url: String,
}

impl ConsumetAdapter {
    pub fn new(name: &str, base_url: &str, settings: &FetchSettings) -> Self {
        Self::with_client(
            name,
            RateLimitClient::for_provider(name, settings, 2.0, 4),
            base_url,
        )
    }

    /// Create adapter with custom HTTP client (for testing)
    pub fn with_client(name: &str, http_client: RateLimitClient, base_url: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn map_source(&self, source: &Value) -> Option<StreamLink> {
        let url = first_string(source, URL_FIELDS)?;
        let is_m3u8 = first_bool(source, M3U8_FIELDS)
            .unwrap_or_else(|| url.split('?').next().is_some_and(|path| path.ends_with(".m3u8")));

        Some(StreamLink {
            provider: self.name.clone(),
            url,
            quality: first_string(source, QUALITY_FIELDS),
            is_m3u8,
        })
    }

    fn map_sources(&self, body: &Value) -> Vec<StreamLink> {
        let sources = match body {
            Value::Array(items) => items.as_slice(),
            _ => first_array(body, SOURCE_LIST_FIELDS)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        };

        sources
            .iter()
            .filter_map(|source| self.map_source(source))
            .collect()
    }
}

#[async_trait]
impl StreamingProviderRepository for ConsumetAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_sources(&self, request: &StreamRequest) -> AppResult<Vec<StreamLink>> {
        let watch_id = request.watch_id();
        let url = format!(
            "{}/watch/{}",
            self.base_url,
            urlencoding::encode(&watch_id)
        );

        log::info!("{}: Getting sources for '{}'", self.name, watch_id);

        let response = self.http_client.get_json(&url).await.ok_or_else(|| {
            AppError::ExternalServiceError(format!("{} source request failed", self.name))
        })?;

        if response.status == 404 {
            return Ok(Vec::new());
        }
        if !response.ok {
            return Err(AppError::ApiError(format!(
                "{} responded with status {}",
                self.name, response.status
            )));
        }

        Ok(response
            .json
            .map(|body| self.map_sources(&body))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adapter() -> ConsumetAdapter {
        ConsumetAdapter::new("Gogoanime", DEFAULT_CONSUMET_URL, &FetchSettings::default())
    }

    #[test]
    fn test_sources_envelope() {
        let body = json!({
            "headers": { "Referer": "https://example.org" },
            "sources": [
                { "url": "https://cdn.example/a/master.m3u8", "quality": "1080p", "isM3U8": true },
                { "url": "https://cdn.example/a/backup.mp4", "quality": "default", "isM3U8": false },
                { "quality": "broken" }
            ]
        });

        let links = adapter().map_sources(&body);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].provider, "gogoanime");
        assert!(links[0].is_m3u8);
        assert_eq!(links[1].quality.as_deref(), Some("default"));
        assert!(!links[1].is_m3u8);
    }

    #[test]
    fn test_links_envelope_infers_m3u8() {
        let body = json!({
            "links": [
                { "file": "https://cdn.example/b/index.m3u8?token=1", "label": "720p" },
                { "src": "https://cdn.example/b/file.mp4" }
            ]
        });

        let links = adapter().map_sources(&body);
        assert_eq!(links.len(), 2);
        assert!(links[0].is_m3u8);
        assert_eq!(links[0].quality.as_deref(), Some("720p"));
        assert!(!links[1].is_m3u8);
        assert_eq!(links[1].quality, None);
    }
}
