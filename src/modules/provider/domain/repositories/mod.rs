mod episode_provider_repo;
mod metadata_provider_repo;
mod streaming_provider_repo;

pub use episode_provider_repo::*;
pub use metadata_provider_repo::*;
pub use streaming_provider_repo::*;
