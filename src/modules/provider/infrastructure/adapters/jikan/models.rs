//! Jikan (MyAnimeList) REST response models

use serde::Deserialize;
use serde_json::Value;

/// One page of `/anime/{id}/episodes`.
///
/// Episodes stay loosely typed; their fields are probed through
/// `FieldAliases::JIKAN`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JikanEpisodeList {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub pagination: Option<JikanPagination>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct JikanPagination {
    #[serde(default)]
    pub last_visible_page: u32,
    #[serde(default)]
    pub has_next_page: bool,
}
