use async_trait::async_trait;

use crate::{
    modules::provider::{
        domain::{
            entities::raw_episode::{AnimeIds, ProviderEpisodes},
            repositories::EpisodeProviderRepository,
        },
        infrastructure::{adapters::field_aliases::FieldAliases, http_client::RateLimitClient},
    },
    shared::{
        config::FetchSettings,
        errors::{AppError, AppResult},
    },
};

use super::models::JikanEpisodeList;

pub const DEFAULT_JIKAN_URL: &str = "https://api.jikan.moe/v4";

/// Upper bound on followed episode pages (100 episodes each)
const MAX_EPISODE_PAGES: u32 = 10;

/// Jikan (MyAnimeList) adapter, used as a secondary episode source
pub struct JikanAdapter {
    http_client: RateLimitClient,
    base_url: String,
}

impl JikanAdapter {
    pub fn new(base_url: &str, settings: &FetchSettings) -> Self {
        Self::with_client(RateLimitClient::for_jikan(settings), base_url)
    }

    /// Create adapter with custom HTTP client (for testing)
    pub fn with_client(http_client: RateLimitClient, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get one page of anime episodes; `Ok(None)` when MAL has no such anime
    async fn get_anime_episodes(&self, id: u32, page: u32) -> AppResult<Option<JikanEpisodeList>> {
        let url = format!("{}/anime/{}/episodes?page={}", self.base_url, id, page);

        log::info!("Jikan: Getting episodes for anime ID '{}' (page: {})", id, page);

        let response = self.http_client.get_json(&url).await.ok_or_else(|| {
            AppError::ExternalServiceError(format!("Jikan episode request failed for {}", id))
        })?;

        match response.status {
            404 => return Ok(None),
            429 => {
                return Err(AppError::RateLimitError(
                    "Jikan rate limit exceeded".to_string(),
                ))
            }
            _ => {}
        }

        let json = response.into_ok_json().ok_or_else(|| {
            AppError::ApiError(format!("Jikan returned no episode data for {}", id))
        })?;

        serde_json::from_value(json).map(Some).map_err(|e| {
            AppError::SerializationError(format!("Failed to deserialize Jikan episodes: {}", e))
        })
    }
}

#[async_trait]
impl EpisodeProviderRepository for JikanAdapter {
    fn name(&self) -> &str {
        "jikan"
    }

    async fn fetch_episodes(&self, ids: &AnimeIds) -> AppResult<Vec<ProviderEpisodes>> {
        let Some(mal_id) = ids.mal else {
            log::debug!("Jikan: no MAL id for AniList {}, skipping", ids.anilist);
            return Ok(Vec::new());
        };

        let mut episodes = Vec::new();
        let mut page = 1;

        loop {
            let list = match self.get_anime_episodes(mal_id, page).await {
                Ok(Some(list)) => list,
                Ok(None) => break,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    log::warn!(
                        "Jikan: stopping at page {} for anime ID '{}': {}",
                        page,
                        mal_id,
                        e
                    );
                    break;
                }
            };

            // Positions continue across pages so number fallbacks stay unique
            let offset = episodes.len();
            episodes.extend(
                list.data
                    .iter()
                    .enumerate()
                    .map(|(index, value)| FieldAliases::JIKAN.raw_episode(value, offset + index + 1)),
            );

            let has_next = list.pagination.map(|p| p.has_next_page).unwrap_or(false);
            if !has_next || page >= MAX_EPISODE_PAGES {
                break;
            }
            page += 1;
        }

        log::info!(
            "Jikan: Found {} episodes for anime ID '{}'",
            episodes.len(),
            mal_id
        );

        if episodes.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![ProviderEpisodes::new(self.name(), episodes)])
    }
}
