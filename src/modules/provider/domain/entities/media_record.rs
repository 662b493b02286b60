use serde::{Deserialize, Serialize};

use super::relation::{RelationEdge, RelationType};
use crate::shared::application::Pagination;

pub const FORMAT_TV: &str = "TV";
pub const FORMAT_MOVIE: &str = "MOVIE";

/// Canonical shape of one title as read from the metadata source.
///
/// `title` is the raw upstream display title (season suffixes included);
/// normalization happens when records are turned into summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MediaRecord {
    /// Metadata-source id (AniList namespace)
    pub id: u32,
    /// Cross-reference id (MyAnimeList namespace)
    pub id_mal: Option<u32>,
    pub title: String,
    pub format: Option<String>,
    pub image: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f32>,
    pub genres: Vec<String>,
    pub synopsis: Option<String>,
    pub relations: Vec<RelationEdge>,
}

impl MediaRecord {
    /// The id handed to clients: the cross-reference id when known
    pub fn canonical_id(&self) -> u32 {
        self.id_mal.filter(|id| *id > 0).unwrap_or(self.id)
    }

    pub fn has_format(&self, format: &str) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case(format))
    }

    pub fn is_movie(&self) -> bool {
        self.has_format(FORMAT_MOVIE)
    }

    pub fn has_relation(&self, relation_type: RelationType) -> bool {
        self.relations
            .iter()
            .any(|edge| edge.relation_type == relation_type)
    }
}

/// One page of the metadata source's bulk list operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MediaPage {
    pub items: Vec<MediaRecord>,
    pub pagination: Option<Pagination>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_id_prefers_cross_reference() {
        let record = MediaRecord {
            id: 16498,
            id_mal: Some(16498 + 1),
            ..Default::default()
        };
        assert_eq!(record.canonical_id(), 16499);

        let without_mal = MediaRecord {
            id: 42,
            id_mal: None,
            ..Default::default()
        };
        assert_eq!(without_mal.canonical_id(), 42);
    }

    #[test]
    fn test_format_checks_ignore_case() {
        let record = MediaRecord {
            format: Some("movie".to_string()),
            ..Default::default()
        };
        assert!(record.is_movie());
        assert!(!record.has_format(FORMAT_TV));
    }
}
