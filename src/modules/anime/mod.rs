pub mod domain;

pub use domain::{AnimeSummary, EpisodePage, EpisodeRecord, SeasonRef};
