pub mod adapters;
pub mod cache;
pub mod http_client;

pub use adapters::{AniListAdapter, AnifyAdapter, ConsumetAdapter, JikanAdapter};
pub use cache::{CacheKey, CacheStats, TtlCache};
pub use http_client::{FetchResponse, RateLimitClient, RetryPolicy};
