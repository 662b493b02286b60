//! AniList provider adapter
//!
//! GraphQL-based adapter for the AniList API. AniList is the authoritative
//! metadata source: bulk lists, single-title detail with relation edges and
//! the MyAnimeList cross-reference lookup all go through here.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::{
    modules::provider::{
        domain::{
            entities::media_record::{MediaPage, MediaRecord},
            repositories::MetadataProviderRepository,
            value_objects::SearchCriteria,
        },
        infrastructure::http_client::RateLimitClient,
    },
    shared::{
        config::FetchSettings,
        errors::{AppError, AppResult},
    },
};

use super::{mapper::AniListMapper, models::*, queries::*};

pub const DEFAULT_ANILIST_URL: &str = "https://graphql.anilist.co";

/// AniList provider adapter with GraphQL API
pub struct AniListAdapter {
    http_client: RateLimitClient,
    base_url: String,
    mapper: AniListMapper,
}

impl AniListAdapter {
    pub fn new(base_url: &str, settings: &FetchSettings) -> Self {
        Self::with_client(RateLimitClient::for_anilist(settings), base_url)
    }

    /// Create adapter with custom HTTP client (for testing)
    pub fn with_client(http_client: RateLimitClient, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            mapper: AniListMapper::new(),
        }
    }

    /// Make a GraphQL request and deserialize its `data` field.
    ///
    /// `Ok(None)` means AniList answered "not found" for the query.
    async fn make_graphql_request<T>(&self, query: &str, variables: Value) -> AppResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let body = json!({
            "query": query,
            "variables": variables,
        });

        log::debug!("AniList: Sending GraphQL request variables: {}", body["variables"]);

        let response = self
            .http_client
            .post_json(&self.base_url, &body)
            .await
            .ok_or_else(|| {
                AppError::ExternalServiceError("AniList request failed".to_string())
            })?;

        if response.status == 404 {
            return Ok(None);
        }
        if response.status == 429 {
            return Err(AppError::RateLimitError(
                "AniList rate limit exceeded".to_string(),
            ));
        }

        let graphql_response = response.json.unwrap_or(Value::Null);

        if let Some(errors) = graphql_response.get("errors").filter(|e| !e.is_null()) {
            let errors: Vec<AniListError> =
                serde_json::from_value(errors.clone()).unwrap_or_default();
            if errors.iter().any(|e| e.status == Some(404)) {
                return Ok(None);
            }
            log::error!("AniList: GraphQL errors in response: {:?}", errors);
            return Err(AppError::ApiError(format!(
                "AniList GraphQL errors: {}",
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            )));
        }

        if !response.ok {
            return Err(AppError::ApiError(format!(
                "AniList responded with status {}",
                response.status
            )));
        }

        let data = graphql_response
            .get("data")
            .cloned()
            .ok_or_else(|| AppError::ApiError("No data field in AniList response".to_string()))?;

        serde_json::from_value(data).map(Some).map_err(|e| {
            AppError::SerializationError(format!("Failed to deserialize AniList data: {}", e))
        })
    }

    /// GraphQL variables for a list query; absent criteria are omitted
    fn page_variables(criteria: &SearchCriteria) -> Value {
        let mut variables = Map::new();
        variables.insert("page".into(), json!(criteria.page));
        variables.insert("perPage".into(), json!(criteria.per_page));
        variables.insert("sort".into(), json!([criteria.sort.as_graphql()]));

        if let Some(search) = criteria.search.as_deref().filter(|s| !s.is_empty()) {
            variables.insert("search".into(), json!(search));
        }
        if let Some(genre) = criteria.genre.as_deref() {
            variables.insert("genre".into(), json!(genre));
        }
        if let Some(window) = criteria.airing {
            variables.insert("season".into(), json!(window.season.as_graphql()));
            variables.insert("seasonYear".into(), json!(window.year));
        }

        Value::Object(variables)
    }

    async fn fetch_media(&self, variables: Value) -> AppResult<Option<MediaRecord>> {
        let response: Option<AniListMediaResponse> = self
            .make_graphql_request(MEDIA_DETAIL_QUERY, variables)
            .await?;

        match response.and_then(|r| r.media) {
            Some(media) => self.mapper.map_to_media_record(media).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl MetadataProviderRepository for AniListAdapter {
    async fn list_media(&self, criteria: &SearchCriteria) -> AppResult<MediaPage> {
        log::info!(
            "AniList: Listing media (sort: {:?}, search: {:?}, genre: {:?}, page: {})",
            criteria.sort,
            criteria.search,
            criteria.genre,
            criteria.page
        );

        let response: Option<AniListPageResponse> = self
            .make_graphql_request(MEDIA_PAGE_QUERY, Self::page_variables(criteria))
            .await?;

        let Some(page) = response.map(|r| r.page) else {
            return Ok(MediaPage::default());
        };

        let count = page.media.len();
        let pagination = page
            .page_info
            .as_ref()
            .map(|info| self.mapper.map_page_info(info, count));
        let items = self.mapper.map_media_list(page.media);

        log::info!("AniList: Found {} results", items.len());
        Ok(MediaPage { items, pagination })
    }

    async fn get_media(&self, id: u32) -> AppResult<Option<MediaRecord>> {
        log::info!("AniList: Getting anime by ID '{}'", id);
        self.fetch_media(json!({ "id": id })).await
    }

    async fn find_by_mal_id(&self, mal_id: u32) -> AppResult<Option<MediaRecord>> {
        log::info!("AniList: Getting anime by MAL ID '{}'", mal_id);
        self.fetch_media(json!({ "idMal": mal_id })).await
    }

    async fn genres(&self) -> AppResult<Vec<String>> {
        let response: Option<AniListGenreResponse> = self
            .make_graphql_request(GENRE_COLLECTION_QUERY, json!({}))
            .await?;

        Ok(response
            .map(|r| r.genres.into_iter().flatten().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::provider::domain::value_objects::{AiringSeason, AiringWindow};

    #[test]
    fn test_page_variables_omit_absent_criteria() {
        let variables = AniListAdapter::page_variables(&SearchCriteria::trending(2));
        assert_eq!(variables["page"], 2);
        assert_eq!(variables["sort"][0], "TRENDING_DESC");
        assert!(variables.get("search").is_none());
        assert!(variables.get("genre").is_none());
        assert!(variables.get("season").is_none());
    }

    #[test]
    fn test_page_variables_for_new_releases() {
        let window = AiringWindow {
            season: AiringSeason::Fall,
            year: 2026,
        };
        let variables = AniListAdapter::page_variables(&SearchCriteria::new_releases(window, 1));
        assert_eq!(variables["season"], "FALL");
        assert_eq!(variables["seasonYear"], 2026);
    }

    #[test]
    fn test_page_variables_for_search_and_genre() {
        let variables = AniListAdapter::page_variables(&SearchCriteria::search(" frieren ", 1));
        assert_eq!(variables["search"], "frieren");

        let variables =
            AniListAdapter::page_variables(&SearchCriteria::discover(Some("Action"), 1));
        assert_eq!(variables["genre"], "Action");
        assert_eq!(variables["sort"][0], "POPULARITY_DESC");
    }
}
