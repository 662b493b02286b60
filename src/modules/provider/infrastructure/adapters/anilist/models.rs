//! AniList GraphQL response models
//!
//! Only the fields the catalog reads are modelled; everything else the API
//! returns is ignored by serde.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: Option<u32>,
    pub id_mal: Option<u32>,
    pub title: Option<MediaTitle>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub cover_image: Option<MediaCoverImage>,
    pub genres: Option<Vec<String>>,
    pub average_score: Option<i32>,
    pub start_date: Option<FuzzyDate>,
    pub season_year: Option<i32>,
    pub relations: Option<RelationConnection>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaCoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct RelationConnection {
    #[serde(default)]
    pub edges: Vec<MediaEdge>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaEdge {
    pub relation_type: Option<String>,
    pub node: Option<Media>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListError {
    pub message: String,
    pub status: Option<i32>,
}

// Page wrapper for paginated queries
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: Option<u32>,
    pub per_page: Option<u32>,
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub has_next_page: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListPageResponse {
    #[serde(rename = "Page")]
    pub page: Page,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListMediaResponse {
    #[serde(rename = "Media")]
    pub media: Option<Media>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListGenreResponse {
    #[serde(rename = "GenreCollection", default)]
    pub genres: Vec<Option<String>>,
}
