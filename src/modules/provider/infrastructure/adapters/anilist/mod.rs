mod adapter;
mod mapper;
mod models;
mod queries;

pub use adapter::{AniListAdapter, DEFAULT_ANILIST_URL};
pub use mapper::AniListMapper;
