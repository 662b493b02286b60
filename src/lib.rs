//! Cross-provider anime catalog.
//!
//! Metadata comes from a GraphQL catalog, episodes from an aggregator with
//! a MyAnimeList-backed fallback, and streaming links from scraper APIs.
//! [`CatalogService`] is the entry point; everything it returns is cached
//! per resource class.

pub mod modules;
pub mod shared;

pub use modules::catalog::{CatalogService, CatalogSettings};
pub use shared::{AppConfig, AppError, AppResult};
