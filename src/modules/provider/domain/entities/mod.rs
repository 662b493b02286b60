pub mod media_record;
pub mod raw_episode;
pub mod relation;
pub mod stream_link;

pub use media_record::*;
pub use raw_episode::*;
pub use relation::*;
pub use stream_link::*;
