use serde::{Deserialize, Serialize};

use crate::modules::anime::domain::services::{
    synopsis_cleaner::clean_synopsis, title_normalizer::normalize_title,
};
use crate::modules::provider::domain::entities::media_record::MediaRecord;

/// One entry of a resolved season chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRef {
    pub id: u32,
    /// 1-based position in the chain, not an upstream season number
    pub number: u32,
    pub title: String,
}

/// Provider-agnostic view of one title as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeSummary {
    pub id: u32,
    /// Always the normalized base title
    pub title: String,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f32>,
    pub sub_dub: Option<String>,
    pub genres: Vec<String>,
    pub synopsis: Option<String>,
    pub seasons: Vec<SeasonRef>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_new_season: Option<bool>,
}

impl AnimeSummary {
    pub fn from_record(record: &MediaRecord) -> Self {
        Self {
            id: record.canonical_id(),
            title: normalize_title(&record.title),
            image: record.image.clone(),
            anime_type: record.format.clone(),
            year: record.year,
            rating: record.rating,
            sub_dub: None,
            genres: record.genres.clone(),
            synopsis: clean_synopsis(record.synopsis.as_deref()),
            seasons: Vec::new(),
            is_new_season: None,
        }
    }

    pub fn with_seasons(mut self, seasons: Vec<SeasonRef>) -> Self {
        self.seasons = seasons;
        self
    }

    pub fn with_new_season_flag(mut self, is_new_season: bool) -> Self {
        self.is_new_season = Some(is_new_season);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record_normalizes_title_and_synopsis() {
        let record = MediaRecord {
            id: 21,
            id_mal: Some(40028),
            title: "Attack on Titan Final Season Part 2".to_string(),
            format: Some("TV".to_string()),
            synopsis: Some("The war<br>continues.".to_string()),
            ..Default::default()
        };

        let summary = AnimeSummary::from_record(&record);
        assert_eq!(summary.id, 40028);
        assert_eq!(summary.title, "Attack on Titan");
        assert_eq!(summary.synopsis.as_deref(), Some("The war continues."));
        assert_eq!(summary.anime_type.as_deref(), Some("TV"));
    }

    #[test]
    fn test_serialized_shape() {
        let summary = AnimeSummary::from_record(&MediaRecord {
            id: 1,
            title: "Frieren".to_string(),
            ..Default::default()
        });

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], serde_json::Value::Null);
        assert_eq!(json["subDub"], serde_json::Value::Null);
        assert!(json["seasons"].as_array().unwrap().is_empty());
        assert!(json.get("isNewSeason").is_none());

        let flagged = serde_json::to_value(summary.with_new_season_flag(true)).unwrap();
        assert_eq!(flagged["isNewSeason"], true);
    }
}
