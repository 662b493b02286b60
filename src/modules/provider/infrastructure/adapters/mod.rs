pub mod anify;
pub mod anilist;
pub mod consumet;
pub mod field_aliases;
pub mod jikan;

pub use anify::AnifyAdapter;
pub use anilist::AniListAdapter;
pub use consumet::ConsumetAdapter;
pub use field_aliases::FieldAliases;
pub use jikan::JikanAdapter;
