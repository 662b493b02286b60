use async_trait::async_trait;

use crate::modules::provider::domain::entities::{AnimeIds, ProviderEpisodes};
use crate::shared::errors::AppResult;

/// Repository interface for an episode-list source
///
/// A source may answer with several sub-provider lists for one title; the
/// reconciler decides which of them wins per episode number.
#[async_trait]
pub trait EpisodeProviderRepository: Send + Sync {
    /// Stable lowercase name, matched against configured fallback order
    fn name(&self) -> &str;

    async fn fetch_episodes(&self, ids: &AnimeIds) -> AppResult<Vec<ProviderEpisodes>>;
}
