use async_trait::async_trait;

use crate::modules::provider::domain::entities::{StreamLink, StreamRequest};
use crate::shared::errors::AppResult;

/// Repository interface for a streaming-link source
#[async_trait]
pub trait StreamingProviderRepository: Send + Sync {
    fn name(&self) -> &str;

    /// Zero or more playable sources for one episode
    async fn fetch_sources(&self, request: &StreamRequest) -> AppResult<Vec<StreamLink>>;
}
