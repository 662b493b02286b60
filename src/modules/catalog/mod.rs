pub mod application;

pub use application::{CatalogService, CatalogSettings, GenreList, SearchResults, StreamingLinks};
