use serde::{Deserialize, Serialize};

use crate::modules::anime::domain::entities::AnimeSummary;
use crate::modules::provider::domain::entities::stream_link::StreamLink;
use crate::shared::application::Pagination;

/// List response for trending, search, discover and new releases.
///
/// `results` is always present; `pagination` serializes as `null` when the
/// query had nothing to page over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResults {
    pub results: Vec<AnimeSummary>,
    pub pagination: Option<Pagination>,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenreList {
    pub results: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreamingLinks {
    pub links: Vec<StreamLink>,
}
