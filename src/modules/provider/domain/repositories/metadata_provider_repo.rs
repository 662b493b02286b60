use async_trait::async_trait;

use crate::modules::provider::domain::{
    entities::{MediaPage, MediaRecord},
    value_objects::SearchCriteria,
};
use crate::shared::errors::AppResult;

/// Repository interface for the authoritative metadata source
///
/// Besides list and detail lookups this exposes the alternate-namespace
/// lookup the catalog uses to resolve cross-reference ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProviderRepository: Send + Sync {
    /// Bulk list-by-criteria (search, sort, genre filter, airing window)
    async fn list_media(&self, criteria: &SearchCriteria) -> AppResult<MediaPage>;

    /// Full record by metadata-source id, including relation edges
    ///
    /// `Ok(None)` means the source has no such title.
    async fn get_media(&self, id: u32) -> AppResult<Option<MediaRecord>>;

    /// Full record looked up by its cross-reference (MyAnimeList) id
    async fn find_by_mal_id(&self, mal_id: u32) -> AppResult<Option<MediaRecord>>;

    /// Every genre the source can filter by
    async fn genres(&self) -> AppResult<Vec<String>>;
}
