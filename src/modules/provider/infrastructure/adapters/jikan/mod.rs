mod adapter;
mod models;

pub use adapter::{JikanAdapter, DEFAULT_JIKAN_URL};
