use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use super::dto::{GenreList, SearchResults, StreamingLinks};
use crate::modules::anime::domain::{
    entities::{AnimeSummary, EpisodePage, EpisodeRecord},
    services::{
        episode_reconciler::{paginate, reconcile},
        season_chain_resolver::SeasonChainResolver,
        title_normalizer::{has_season_suffix, normalize_title, slugify},
    },
};
use crate::modules::provider::{
    domain::{
        entities::{
            media_record::{MediaRecord, FORMAT_MOVIE},
            raw_episode::{AnimeIds, ProviderEpisodes},
            relation::RelationType,
            stream_link::StreamRequest,
        },
        repositories::{
            EpisodeProviderRepository, MetadataProviderRepository, StreamingProviderRepository,
        },
        value_objects::{AiringWindow, SearchCriteria},
    },
    infrastructure::{
        adapters::{AniListAdapter, AnifyAdapter, ConsumetAdapter, JikanAdapter},
        cache::{CacheKey, CacheStats, TtlCache},
    },
};
use crate::shared::{
    config::AppConfig,
    errors::{AppError, AppResult},
    utils::{LogContext, TimedOperation},
};

/// Facade-level tuning taken from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub search_cache_ttl: Duration,
    pub episode_cache_ttl: Duration,
    /// Sub-provider order used when reconciling episode lists
    pub episode_preference: Vec<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CatalogSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            search_cache_ttl: config.search_cache_ttl,
            episode_cache_ttl: config.episode_cache_ttl,
            episode_preference: config.episode_preference.clone(),
        }
    }
}

/// Convert a recoverable provider failure into `fallback`
fn recover<T>(operation: &str, provider: &str, error: AppError, fallback: T) -> AppResult<T> {
    if error.is_recoverable() {
        LogContext::provider_failure(operation, provider, &error);
        Ok(fallback)
    } else {
        Err(error)
    }
}

/// Summaries for a ranked list, keeping the first entry of each base title
fn group_by_base_title(records: &[MediaRecord]) -> Vec<AnimeSummary> {
    let mut seen = HashSet::new();

    records
        .iter()
        .map(AnimeSummary::from_record)
        .filter(|summary| seen.insert(summary.title.to_lowercase()))
        .collect()
}

/// The single entry point other layers call.
///
/// Every operation checks its cache, resolves ids across namespaces when
/// needed, calls the providers and stores the result. Provider failures
/// degrade to empty results; only non-recoverable errors reach the caller.
pub struct CatalogService {
    metadata: Arc<dyn MetadataProviderRepository>,
    primary_episodes: Arc<dyn EpisodeProviderRepository>,
    fallback_episodes: Vec<Arc<dyn EpisodeProviderRepository>>,
    streaming: Vec<Arc<dyn StreamingProviderRepository>>,
    resolver: SeasonChainResolver,
    episode_preference: Vec<String>,
    search_cache: TtlCache<SearchResults>,
    genre_cache: TtlCache<GenreList>,
    info_cache: TtlCache<AnimeSummary>,
    ids_cache: TtlCache<MediaRecord>,
    episode_cache: TtlCache<Vec<EpisodeRecord>>,
    stream_cache: TtlCache<StreamingLinks>,
}

impl CatalogService {
    pub fn new(
        metadata: Arc<dyn MetadataProviderRepository>,
        primary_episodes: Arc<dyn EpisodeProviderRepository>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            resolver: SeasonChainResolver::new(metadata.clone()),
            metadata,
            primary_episodes,
            fallback_episodes: Vec::new(),
            streaming: Vec::new(),
            episode_preference: settings.episode_preference,
            search_cache: TtlCache::new("search", settings.search_cache_ttl),
            genre_cache: TtlCache::new("genres", settings.search_cache_ttl),
            info_cache: TtlCache::new("info", settings.search_cache_ttl),
            ids_cache: TtlCache::new("ids", settings.search_cache_ttl),
            episode_cache: TtlCache::new("episodes", settings.episode_cache_ttl),
            stream_cache: TtlCache::new("streams", settings.episode_cache_ttl),
        }
    }

    /// Secondary episode sources, tried in order when the primary is empty
    pub fn with_fallback_episodes(
        mut self,
        sources: Vec<Arc<dyn EpisodeProviderRepository>>,
    ) -> Self {
        self.fallback_episodes = sources;
        self
    }

    /// Streaming-link sources; their order is the order of returned links
    pub fn with_streaming(mut self, sources: Vec<Arc<dyn StreamingProviderRepository>>) -> Self {
        self.streaming = sources;
        self
    }

    /// Wire the concrete adapters described by `config`
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let metadata: Arc<dyn MetadataProviderRepository> =
            Arc::new(AniListAdapter::new(&config.anilist_url, &config.fetch));
        let primary: Arc<dyn EpisodeProviderRepository> =
            Arc::new(AnifyAdapter::new(&config.episode_api_url, &config.fetch));

        let fallbacks = config
            .episode_fallback_order
            .iter()
            .map(|name| -> AppResult<Arc<dyn EpisodeProviderRepository>> {
                match name.as_str() {
                    "jikan" => Ok(Arc::new(JikanAdapter::new(&config.jikan_url, &config.fetch))),
                    "anify" => Ok(Arc::new(AnifyAdapter::new(
                        &config.episode_api_url,
                        &config.fetch,
                    ))),
                    other => Err(AppError::ConfigError(format!(
                        "Unknown episode fallback source '{}'",
                        other
                    ))),
                }
            })
            .collect::<AppResult<Vec<_>>>()?;

        let streaming = config
            .streaming_providers
            .iter()
            .map(|source| -> Arc<dyn StreamingProviderRepository> {
                Arc::new(ConsumetAdapter::new(&source.name, &source.base_url, &config.fetch))
            })
            .collect();

        Ok(Self::new(metadata, primary, CatalogSettings::from(config))
            .with_fallback_episodes(fallbacks)
            .with_streaming(streaming))
    }

    // =========================================================================
    // LIST QUERIES
    // =========================================================================

    pub async fn trending(&self, page: u32) -> AppResult<SearchResults> {
        self.list("trending", SearchCriteria::trending(page)).await
    }

    /// Free-text search; a blank query is answered without any lookup
    pub async fn search(&self, query: &str, page: u32) -> AppResult<SearchResults> {
        if query.trim().is_empty() {
            return Ok(SearchResults::empty());
        }
        self.list("search", SearchCriteria::search(query, page)).await
    }

    pub async fn discover(&self, genre: Option<&str>, page: u32) -> AppResult<SearchResults> {
        self.list("discover", SearchCriteria::discover(genre, page)).await
    }

    /// Titles airing this season
    pub async fn new_releases(&self, page: u32) -> AppResult<SearchResults> {
        self.new_releases_in(AiringWindow::current(), page).await
    }

    /// Titles airing in `window`, flagged when they continue an earlier season
    pub async fn new_releases_in(&self, window: AiringWindow, page: u32) -> AppResult<SearchResults> {
        let criteria = SearchCriteria::new_releases(window, page);
        let key = CacheKey::new("new-releases")
            .part(window.season.as_graphql())
            .part(window.year)
            .part(criteria.page)
            .part(criteria.per_page)
            .build();

        if let Some(hit) = self.search_cache.get(&key) {
            LogContext::catalog_query("new-releases", &key, hit.results.len(), true);
            return Ok(hit);
        }

        let page = match self.metadata.list_media(&criteria).await {
            Ok(page) => page,
            Err(e) => return recover("new-releases", "metadata", e, SearchResults::empty()),
        };

        let results: Vec<AnimeSummary> = page
            .items
            .iter()
            .map(|record| {
                let continues = record.has_relation(RelationType::Prequel)
                    || has_season_suffix(&record.title);
                AnimeSummary::from_record(record).with_new_season_flag(continues)
            })
            .collect();

        let response = SearchResults {
            results,
            pagination: page.pagination,
        };
        self.store_list(key, &response, "new-releases");
        Ok(response)
    }

    async fn list(&self, operation: &str, criteria: SearchCriteria) -> AppResult<SearchResults> {
        let key = CacheKey::new(operation)
            .opt_part(criteria.search.as_deref())
            .opt_part(criteria.genre.as_deref())
            .part(criteria.page)
            .part(criteria.per_page)
            .build();

        if let Some(hit) = self.search_cache.get(&key) {
            LogContext::catalog_query(operation, &key, hit.results.len(), true);
            return Ok(hit);
        }

        let timer = TimedOperation::new(operation);
        let page = match self.metadata.list_media(&criteria).await {
            Ok(page) => page,
            Err(e) => return recover(operation, "metadata", e, SearchResults::empty()),
        };

        let response = SearchResults {
            results: group_by_base_title(&page.items),
            pagination: page.pagination,
        };
        timer.finish();

        self.store_list(key, &response, operation);
        Ok(response)
    }

    fn store_list(&self, key: String, response: &SearchResults, operation: &str) {
        LogContext::catalog_query(operation, &key, response.results.len(), false);
        if !response.is_empty() {
            self.search_cache.set(key, response.clone());
        }
    }

    pub async fn genres(&self) -> AppResult<GenreList> {
        let key = CacheKey::new("genres").build();
        if let Some(hit) = self.genre_cache.get(&key) {
            return Ok(hit);
        }

        let results = match self.metadata.genres().await {
            Ok(genres) => genres,
            Err(e) => return recover("genres", "metadata", e, GenreList::default()),
        };

        let response = GenreList { results };
        LogContext::catalog_query("genres", &key, response.results.len(), false);
        if !response.results.is_empty() {
            self.genre_cache.set(key, response.clone());
        }
        Ok(response)
    }

    // =========================================================================
    // SINGLE-TITLE QUERIES
    // =========================================================================

    /// Look up an incoming id, MyAnimeList namespace first, then AniList.
    ///
    /// `Ok(None)` when neither namespace knows the id.
    async fn resolve_record(&self, id: u32) -> AppResult<Option<MediaRecord>> {
        let key = CacheKey::new("ids").part(id).build();
        if let Some(hit) = self.ids_cache.get(&key) {
            return Ok(Some(hit));
        }

        // Only a confirmed MAL miss falls through to the AniList namespace
        let by_mal = match self.metadata.find_by_mal_id(id).await {
            Ok(found) => found,
            Err(e) => return recover("resolve", "metadata", e, None),
        };

        let record = match by_mal {
            Some(record) => Some(record),
            None => {
                log::debug!("Id {} unknown as MAL id, trying AniList namespace", id);
                match self.metadata.get_media(id).await {
                    Ok(found) => found,
                    Err(e) => recover("resolve", "metadata", e, None)?,
                }
            }
        };

        if let Some(record) = &record {
            self.ids_cache.set(key, record.clone());
        }
        Ok(record)
    }

    /// Full summary with its resolved season list
    pub async fn info(&self, id: u32) -> AppResult<Option<AnimeSummary>> {
        let key = CacheKey::new("info").part(id).build();
        if let Some(hit) = self.info_cache.get(&key) {
            return Ok(Some(hit));
        }

        let timer = TimedOperation::new("info");
        let Some(record) = self.resolve_record(id).await? else {
            log::info!("Catalog: no title found for id {}", id);
            return Ok(None);
        };

        let seasons = if record.is_movie() {
            Vec::new()
        } else {
            self.resolver
                .resolve(&record)
                .await
                .without_format(FORMAT_MOVIE)
                .season_refs()
        };

        let summary = AnimeSummary::from_record(&record).with_seasons(seasons);
        timer.finish_with_info(&format!("{} seasons", summary.seasons.len()));

        self.info_cache.set(key, summary.clone());
        Ok(Some(summary))
    }

    /// One page of the reconciled episode list
    pub async fn episodes(&self, id: u32, page: u32) -> AppResult<EpisodePage> {
        let key = CacheKey::new("episodes").part(id).build();

        let episodes = match self.episode_cache.get(&key) {
            Some(hit) => {
                LogContext::catalog_query("episodes", &key, hit.len(), true);
                hit
            }
            None => {
                let loaded = self.load_episodes(id).await?;
                LogContext::catalog_query("episodes", &key, loaded.len(), false);
                // Empty lists are cached too, to stop hammering sources with nothing
                self.episode_cache.set(key, loaded.clone());
                loaded
            }
        };

        Ok(paginate(&episodes, page))
    }

    async fn load_episodes(&self, id: u32) -> AppResult<Vec<EpisodeRecord>> {
        let Some(record) = self.resolve_record(id).await? else {
            return Ok(Vec::new());
        };
        let ids = AnimeIds {
            anilist: record.id,
            mal: record.id_mal,
        };

        let lists = self.fetch_episode_lists(self.primary_episodes.as_ref(), &ids).await?;
        let mut episodes = reconcile(lists, &self.episode_preference);

        let mut previous = self.primary_episodes.name().to_string();
        for source in &self.fallback_episodes {
            if !episodes.is_empty() {
                break;
            }
            LogContext::provider_fallback("episodes", &previous, source.name());

            let lists = self.fetch_episode_lists(source.as_ref(), &ids).await?;
            episodes = reconcile(lists, &self.episode_preference);
            previous = source.name().to_string();
        }

        Ok(episodes)
    }

    async fn fetch_episode_lists(
        &self,
        source: &dyn EpisodeProviderRepository,
        ids: &AnimeIds,
    ) -> AppResult<Vec<ProviderEpisodes>> {
        match source.fetch_episodes(ids).await {
            Ok(lists) => Ok(lists),
            Err(e) => recover("episodes", source.name(), e, Vec::new()),
        }
    }

    /// Streaming links for one episode from every configured source
    pub async fn streaming(
        &self,
        id: u32,
        episode_number: u32,
        episode_id: Option<&str>,
    ) -> AppResult<StreamingLinks> {
        if episode_number == 0 {
            return Err(AppError::InvalidInput(
                "Episode number must be positive".to_string(),
            ));
        }

        let key = CacheKey::new("streams")
            .part(id)
            .part(episode_number)
            .opt_part(episode_id)
            .build();
        if let Some(hit) = self.stream_cache.get(&key) {
            return Ok(hit);
        }

        if self.streaming.is_empty() {
            return Ok(StreamingLinks::default());
        }

        let Some(record) = self.resolve_record(id).await? else {
            return Ok(StreamingLinks::default());
        };

        let request = StreamRequest {
            slug: slugify(&normalize_title(&record.title)),
            episode_number,
            episode_id: episode_id.map(str::to_string),
        };

        // join_all yields results in input order, which is the configured order
        let results = join_all(
            self.streaming
                .iter()
                .map(|source| source.fetch_sources(&request)),
        )
        .await;

        let mut links = Vec::new();
        for (source, result) in self.streaming.iter().zip(results) {
            match result {
                Ok(found) => links.extend(found),
                Err(e) => recover("streaming", source.name(), e, ())?,
            }
        }

        let response = StreamingLinks { links };
        LogContext::catalog_query("streaming", &key, response.links.len(), false);
        if !response.links.is_empty() {
            self.stream_cache.set(key, response.clone());
        }
        Ok(response)
    }

    /// Per-cache hit/miss counters
    pub fn cache_stats(&self) -> Vec<(&'static str, CacheStats)> {
        vec![
            (self.search_cache.name(), self.search_cache.stats()),
            (self.genre_cache.name(), self.genre_cache.stats()),
            (self.info_cache.name(), self.info_cache.stats()),
            (self.ids_cache.name(), self.ids_cache.stats()),
            (self.episode_cache.name(), self.episode_cache.stats()),
            (self.stream_cache.name(), self.stream_cache.stats()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::provider::domain::{
        entities::{media_record::MediaPage, relation::RelationEdge},
        repositories::MockMetadataProviderRepository,
    };
    use crate::shared::application::Pagination;
    use async_trait::async_trait;
    use mockall::predicate::eq;

    struct NoEpisodes;

    #[async_trait]
    impl EpisodeProviderRepository for NoEpisodes {
        fn name(&self) -> &str {
            "none"
        }

        async fn fetch_episodes(&self, _ids: &AnimeIds) -> AppResult<Vec<ProviderEpisodes>> {
            Ok(Vec::new())
        }
    }

    fn service(metadata: MockMetadataProviderRepository) -> CatalogService {
        CatalogService::new(
            Arc::new(metadata),
            Arc::new(NoEpisodes),
            CatalogSettings::default(),
        )
    }

    fn record(id: u32, title: &str) -> MediaRecord {
        MediaRecord {
            id,
            title: title.to_string(),
            format: Some("TV".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_by_base_title_keeps_first() {
        let records = vec![
            record(1, "Show Season 2"),
            record(2, "Other"),
            record(3, "Show"),
        ];
        let grouped = group_by_base_title(&records);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].id, 1);
        assert_eq!(grouped[0].title, "Show");
    }

    #[tokio::test]
    async fn test_blank_search_skips_upstream() {
        let metadata = MockMetadataProviderRepository::new();
        let results = service(metadata).search("   ", 1).await.unwrap();
        assert!(results.results.is_empty());
        assert!(results.pagination.is_none());
    }

    #[tokio::test]
    async fn test_trending_is_cached() {
        let mut metadata = MockMetadataProviderRepository::new();
        metadata.expect_list_media().times(1).returning(|_| {
            Ok(MediaPage {
                items: vec![record(1, "Frieren")],
                pagination: Some(Pagination::for_page(1, 20, 1, 1)),
            })
        });

        let catalog = service(metadata);
        let first = catalog.trending(1).await.unwrap();
        let second = catalog.trending(1).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.results[0].title, "Frieren");
    }

    #[tokio::test]
    async fn test_list_failure_degrades_to_empty() {
        let mut metadata = MockMetadataProviderRepository::new();
        metadata
            .expect_list_media()
            .times(2)
            .returning(|_| Err(AppError::ExternalServiceError("down".to_string())));

        let catalog = service(metadata);
        let results = catalog.discover(Some("Action"), 1).await.unwrap();
        assert!(results.results.is_empty());
        // Empty results are not cached
        catalog.discover(Some("Action"), 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_internal_errors_surface() {
        let mut metadata = MockMetadataProviderRepository::new();
        metadata
            .expect_list_media()
            .returning(|_| Err(AppError::InternalError("bug".to_string())));

        let result = service(metadata).trending(1).await;
        assert!(matches!(result, Err(AppError::InternalError(_))));
    }

    #[tokio::test]
    async fn test_info_resolves_anilist_namespace_after_mal_miss() {
        let mut metadata = MockMetadataProviderRepository::new();
        metadata
            .expect_find_by_mal_id()
            .with(eq(7))
            .times(1)
            .returning(|_| Ok(None));
        metadata
            .expect_get_media()
            .with(eq(7))
            .times(1)
            .returning(|_| {
                let mut movie = record(7, "Show: The Movie");
                movie.format = Some("MOVIE".to_string());
                movie.relations = vec![RelationEdge::prequel(6, Some("TV"), "Show")];
                Ok(Some(movie))
            });

        let summary = service(metadata).info(7).await.unwrap().unwrap();
        assert_eq!(summary.id, 7);
        // Movies get no season list and their relations are not walked
        assert!(summary.seasons.is_empty());
    }

    #[tokio::test]
    async fn test_info_mal_failure_does_not_fall_back_or_cache() {
        let mut metadata = MockMetadataProviderRepository::new();
        metadata
            .expect_find_by_mal_id()
            .with(eq(5114))
            .times(2)
            .returning(|_| Err(AppError::ExternalServiceError("timeout".to_string())));
        metadata.expect_get_media().never();

        let catalog = service(metadata);
        assert_eq!(catalog.info(5114).await.unwrap(), None);
        // Nothing cached: the second call reaches the MAL lookup again
        assert_eq!(catalog.info(5114).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_info_not_found_in_either_namespace() {
        let mut metadata = MockMetadataProviderRepository::new();
        metadata.expect_find_by_mal_id().returning(|_| Ok(None));
        metadata.expect_get_media().returning(|_| Ok(None));

        assert_eq!(service(metadata).info(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_new_release_flags() {
        let mut metadata = MockMetadataProviderRepository::new();
        metadata.expect_list_media().returning(|criteria| {
            assert!(criteria.airing.is_some());
            let mut sequel = record(2, "Show");
            sequel.relations = vec![RelationEdge::prequel(1, Some("TV"), "Show")];
            Ok(MediaPage {
                items: vec![record(1, "Fresh"), sequel, record(3, "Other Season 2")],
                pagination: None,
            })
        });

        let window = AiringWindow::containing(
            chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        );
        let results = service(metadata).new_releases_in(window, 1).await.unwrap();
        let flags: Vec<_> = results
            .results
            .iter()
            .map(|s| s.is_new_season)
            .collect();
        assert_eq!(flags, vec![Some(false), Some(true), Some(true)]);
        assert_eq!(results.results[2].title, "Other");
    }

    #[test]
    fn test_unknown_fallback_source_is_rejected() {
        let config = AppConfig {
            episode_fallback_order: vec!["nowhere".to_string()],
            ..AppConfig::default()
        };
        assert!(matches!(
            CatalogService::from_config(&config),
            Err(AppError::ConfigError(_))
        ));
    }
}
