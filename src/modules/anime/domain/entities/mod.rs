pub mod anime_summary;
pub mod episode_record;

pub use anime_summary::{AnimeSummary, SeasonRef};
pub use episode_record::{EpisodePage, EpisodeRecord};
