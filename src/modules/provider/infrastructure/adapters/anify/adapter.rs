//! Anify episode adapter
//!
//! The primary episode source. One lookup by AniList id returns a list of
//! sub-provider entries, each carrying its own episode list with whatever
//! field names that sub-provider uses.

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    modules::provider::{
        domain::{
            entities::raw_episode::{AnimeIds, ProviderEpisodes},
            repositories::EpisodeProviderRepository,
        },
        infrastructure::{
            adapters::field_aliases::{first_array, first_string, FieldAliases},
            http_client::RateLimitClient,
        },
    },
    shared::{
        config::FetchSettings,
        errors::{AppError, AppResult},
    },
};

pub const DEFAULT_ANIFY_URL: &str = "https://api.anify.tv";

const PROVIDER_NAME_FIELDS: &[&str] = &["providerId", "provider", "id"];
const PROVIDER_LIST_FIELDS: &[&str] = &["data", "providers"];
const EPISODE_LIST_FIELDS: &[&str] = &["episodes", "data"];
const EPISODE_TRACK_FIELDS: &[&str] = &["sub", "dub"];

pub struct AnifyAdapter {
    http_client: RateLimitClient,
    base_url: String,
    aliases: FieldAliases,
}

impl AnifyAdapter {
    pub fn new(base_url: &str, settings: &FetchSettings) -> Self {
        Self::with_client(
            RateLimitClient::for_provider("Anify", settings, 2.0, 5),
            base_url,
        )
    }

    /// Create adapter with custom HTTP client (for testing)
    pub fn with_client(http_client: RateLimitClient, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            aliases: FieldAliases::ANIFY,
        }
    }

    /// Sub-provider entries, whichever envelope the response uses
    fn provider_entries(body: &Value) -> &[Value] {
        match body {
            Value::Array(entries) => entries.as_slice(),
            Value::Object(_) => first_array(body, PROVIDER_LIST_FIELDS)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            _ => &[],
        }
    }

    /// Episode array of one entry; track-split lists use the first track present
    fn entry_episodes(entry: &Value) -> &[Value] {
        if let Some(episodes) = first_array(entry, EPISODE_LIST_FIELDS) {
            return episodes;
        }

        EPISODE_LIST_FIELDS
            .iter()
            .filter_map(|field| entry.get(*field))
            .find_map(|nested| first_array(nested, EPISODE_TRACK_FIELDS))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn map_entries(&self, body: &Value) -> Vec<ProviderEpisodes> {
        Self::provider_entries(body)
            .iter()
            .map(|entry| {
                let provider = first_string(entry, PROVIDER_NAME_FIELDS)
                    .unwrap_or_else(|| "unknown".to_string());
                let episodes = self.aliases.raw_episodes(Self::entry_episodes(entry));
                ProviderEpisodes::new(&provider, episodes)
            })
            .filter(|list| !list.is_empty())
            .collect()
    }
}

#[async_trait]
impl EpisodeProviderRepository for AnifyAdapter {
    fn name(&self) -> &str {
        "anify"
    }

    async fn fetch_episodes(&self, ids: &AnimeIds) -> AppResult<Vec<ProviderEpisodes>> {
        let url = format!("{}/episodes/{}", self.base_url, ids.anilist);
        log::info!("Anify: Getting episodes for AniList ID '{}'", ids.anilist);

        let response = self.http_client.get_json(&url).await.ok_or_else(|| {
            AppError::ExternalServiceError(format!(
                "Anify episode request failed for {}",
                ids.anilist
            ))
        })?;

        if response.status == 404 {
            return Ok(Vec::new());
        }
        if !response.ok {
            return Err(AppError::ApiError(format!(
                "Anify responded with status {}",
                response.status
            )));
        }

        let lists = response
            .json
            .map(|body| self.map_entries(&body))
            .unwrap_or_default();

        log::info!(
            "Anify: {} sub-providers with episodes for AniList ID '{}'",
            lists.len(),
            ids.anilist
        );
        Ok(lists)
    }
}
