/// In-memory providers with call counters
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use miru_catalog::modules::provider::domain::{
    entities::{
        AnimeIds, MediaPage, MediaRecord, ProviderEpisodes, RawEpisode, StreamLink, StreamRequest,
    },
    repositories::{
        EpisodeProviderRepository, MetadataProviderRepository, StreamingProviderRepository,
    },
    value_objects::SearchCriteria,
};
use miru_catalog::shared::errors::{AppError, AppResult};

/// Metadata source backed by a map of AniList id to record
#[derive(Default)]
pub struct FakeMetadata {
    records: HashMap<u32, MediaRecord>,
    list: Vec<MediaRecord>,
    failing_ids: Vec<u32>,
    pub get_calls: AtomicUsize,
    pub mal_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub last_criteria: Mutex<Option<SearchCriteria>>,
}

impl FakeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: MediaRecord) -> Self {
        self.records.insert(record.id, record);
        self
    }

    /// Records returned, in order, by every list query
    pub fn with_list(mut self, list: Vec<MediaRecord>) -> Self {
        self.list = list;
        self
    }

    /// Lookups of `id` fail with a transport error
    pub fn failing_on(mut self, id: u32) -> Self {
        self.failing_ids.push(id);
        self
    }

    pub fn get_count(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProviderRepository for FakeMetadata {
    async fn list_media(&self, criteria: &SearchCriteria) -> AppResult<MediaPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_criteria.lock().unwrap() = Some(criteria.clone());
        Ok(MediaPage {
            items: self.list.clone(),
            pagination: None,
        })
    }

    async fn get_media(&self, id: u32) -> AppResult<Option<MediaRecord>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_ids.contains(&id) {
            return Err(AppError::ExternalServiceError(format!("lookup {} timed out", id)));
        }
        Ok(self.records.get(&id).cloned())
    }

    async fn find_by_mal_id(&self, mal_id: u32) -> AppResult<Option<MediaRecord>> {
        self.mal_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .values()
            .find(|record| record.id_mal == Some(mal_id))
            .cloned())
    }

    async fn genres(&self) -> AppResult<Vec<String>> {
        Ok(vec!["Action".to_string(), "Drama".to_string()])
    }
}

/// Episode source returning fixed per-provider lists
pub struct FakeEpisodeSource {
    name: String,
    lists: Vec<ProviderEpisodes>,
    error: Option<fn() -> AppError>,
    pub calls: AtomicUsize,
}

impl FakeEpisodeSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lists: Vec::new(),
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Add a sub-provider list with the given `(number, id)` pairs
    pub fn with_list(mut self, provider: &str, episodes: &[(u32, &str)]) -> Self {
        self.lists.push(ProviderEpisodes::new(
            provider,
            episodes
                .iter()
                .map(|(number, id)| RawEpisode::new(id, *number))
                .collect(),
        ));
        self
    }

    pub fn failing_with(mut self, error: fn() -> AppError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EpisodeProviderRepository for FakeEpisodeSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_episodes(&self, _ids: &AnimeIds) -> AppResult<Vec<ProviderEpisodes>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.error {
            Some(make_error) => Err(make_error()),
            None => Ok(self.lists.clone()),
        }
    }
}

/// Streaming source answering after an optional delay
pub struct FakeStreamingSource {
    name: String,
    links: Vec<StreamLink>,
    delay: Duration,
    fail: bool,
    pub requests: Mutex<Vec<StreamRequest>>,
}

impl FakeStreamingSource {
    pub fn new(name: &str, urls: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            links: urls
                .iter()
                .map(|url| StreamLink {
                    provider: name.to_string(),
                    url: url.to_string(),
                    quality: Some("1080p".to_string()),
                    is_m3u8: url.ends_with(".m3u8"),
                })
                .collect(),
            delay: Duration::ZERO,
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl StreamingProviderRepository for FakeStreamingSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_sources(&self, request: &StreamRequest) -> AppResult<Vec<StreamLink>> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(AppError::ApiError(format!("{} is down", self.name)));
        }
        Ok(self.links.clone())
    }
}
