use super::models::*;
use crate::modules::provider::domain::entities::{
    media_record::MediaRecord,
    relation::{RelationEdge, RelationNode, RelationType},
};
use crate::shared::application::{Pagination, PaginationItems};
use crate::shared::errors::{AppError, AppResult};

/// Converts AniList GraphQL shapes into the catalog's record shapes
#[derive(Debug, Clone, Default)]
pub struct AniListMapper;

impl AniListMapper {
    pub fn new() -> Self {
        Self
    }

    /// English title first, romaji second, native last
    fn map_title(title: &Option<MediaTitle>) -> String {
        title
            .as_ref()
            .and_then(|t| {
                [&t.english, &t.romaji, &t.native]
                    .into_iter()
                    .flatten()
                    .map(|s| s.trim())
                    .find(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    fn map_image(cover: &Option<MediaCoverImage>) -> Option<String> {
        cover
            .as_ref()
            .and_then(|c| c.extra_large.clone().or_else(|| c.large.clone()).or_else(|| c.medium.clone()))
    }

    /// AniList scores are 0-100; the catalog rates on a 0-10 scale
    fn map_rating(average_score: Option<i32>) -> Option<f32> {
        average_score
            .filter(|score| *score > 0)
            .map(|score| score as f32 / 10.0)
    }

    fn map_year(media: &Media) -> Option<i32> {
        media
            .season_year
            .or_else(|| media.start_date.as_ref().and_then(|d| d.year))
    }

    fn map_relations(relations: Option<RelationConnection>) -> Vec<RelationEdge> {
        relations
            .map(|connection| connection.edges)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| {
                let node = edge.node?;
                let id = node.id?;
                Some(RelationEdge {
                    relation_type: RelationType::from_upstream(edge.relation_type.as_deref()),
                    node: RelationNode {
                        id,
                        format: node.format,
                        title: Self::map_title(&node.title),
                    },
                })
            })
            .collect()
    }

    pub fn map_to_media_record(&self, media: Media) -> AppResult<MediaRecord> {
        let id = media
            .id
            .ok_or_else(|| AppError::MappingError("AniList media without id".to_string()))?;

        Ok(MediaRecord {
            id,
            id_mal: media.id_mal.filter(|id| *id > 0),
            title: Self::map_title(&media.title),
            format: media.format.clone(),
            image: Self::map_image(&media.cover_image),
            year: Self::map_year(&media),
            rating: Self::map_rating(media.average_score),
            genres: media.genres.clone().unwrap_or_default(),
            synopsis: media.description.clone(),
            relations: Self::map_relations(media.relations),
        })
    }

    /// Map a list, dropping entries that cannot be identified
    pub fn map_media_list(&self, media: Vec<Media>) -> Vec<MediaRecord> {
        media
            .into_iter()
            .filter_map(|m| match self.map_to_media_record(m) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("AniList: skipping unmappable media: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn map_page_info(&self, info: &PageInfo, count: usize) -> Pagination {
        let per_page = info.per_page.unwrap_or(count as u32);
        let total = info.total.unwrap_or(count as u32);

        Pagination {
            page: info.current_page.unwrap_or(1),
            has_next_page: info.has_next_page.unwrap_or(false),
            last_visible_page: info.last_page.unwrap_or(1),
            items: PaginationItems {
                count: count as u32,
                total,
                per_page,
            },
        }
    }
}
