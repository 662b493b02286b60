use serde::{Deserialize, Serialize};

use crate::shared::application::Pagination;

/// One reconciled episode; `number` is positive and unique per anime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub id: String,
    pub number: u32,
    pub title: Option<String>,
    pub air_date: Option<String>,
}

/// One page of an anime's reconciled episode list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodePage {
    pub episodes: Vec<EpisodeRecord>,
    pub pagination: Pagination,
}
