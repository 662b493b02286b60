pub mod catalog_service;
pub mod dto;

pub use catalog_service::{CatalogService, CatalogSettings};
pub use dto::{GenreList, SearchResults, StreamingLinks};
