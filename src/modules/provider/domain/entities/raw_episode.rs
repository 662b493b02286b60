use serde::{Deserialize, Serialize};

/// One episode as read from an episode source, before reconciliation.
///
/// `number` is already coerced: 0 means "not a usable episode number".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawEpisode {
    pub id: Option<String>,
    pub number: u32,
    pub title: Option<String>,
    pub air_date: Option<String>,
}

impl RawEpisode {
    pub fn new(id: &str, number: u32) -> Self {
        Self {
            id: Some(id.to_string()),
            number,
            title: None,
            air_date: None,
        }
    }
}

/// Episode list contributed by one (sub-)provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderEpisodes {
    pub provider: String,
    pub episodes: Vec<RawEpisode>,
}

impl ProviderEpisodes {
    pub fn new(provider: &str, episodes: Vec<RawEpisode>) -> Self {
        Self {
            provider: provider.to_lowercase(),
            episodes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Both ids of one title, after cross-reference resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimeIds {
    pub anilist: u32,
    pub mal: Option<u32>,
}
