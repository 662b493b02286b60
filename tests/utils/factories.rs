/// Builders for upstream records used across integration tests
use miru_catalog::modules::provider::domain::entities::{
    MediaRecord, RelationEdge, FORMAT_MOVIE, FORMAT_TV,
};

pub struct MediaFactory {
    record: MediaRecord,
}

impl MediaFactory {
    /// A TV entry with only an AniList id
    pub fn tv(id: u32, title: &str) -> Self {
        Self {
            record: MediaRecord {
                id,
                title: title.to_string(),
                format: Some(FORMAT_TV.to_string()),
                ..Default::default()
            },
        }
    }

    pub fn movie(id: u32, title: &str) -> Self {
        let mut factory = Self::tv(id, title);
        factory.record.format = Some(FORMAT_MOVIE.to_string());
        factory
    }

    pub fn with_mal_id(mut self, mal_id: u32) -> Self {
        self.record.id_mal = Some(mal_id);
        self
    }

    pub fn with_prequel(mut self, id: u32, format: &str, title: &str) -> Self {
        self.record
            .relations
            .push(RelationEdge::prequel(id, Some(format), title));
        self
    }

    pub fn with_sequel(mut self, id: u32, format: &str, title: &str) -> Self {
        self.record
            .relations
            .push(RelationEdge::sequel(id, Some(format), title));
        self
    }

    pub fn with_synopsis(mut self, synopsis: &str) -> Self {
        self.record.synopsis = Some(synopsis.to_string());
        self
    }

    pub fn build(self) -> MediaRecord {
        self.record
    }
}
