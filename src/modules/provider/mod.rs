pub mod domain;
pub mod infrastructure;

pub use domain::{
    AnimeIds, EpisodeProviderRepository, MediaPage, MediaRecord,
    MetadataProviderRepository, ProviderEpisodes, RawEpisode, RelationEdge, RelationType,
    SearchCriteria, StreamLink, StreamRequest, StreamingProviderRepository,
};
