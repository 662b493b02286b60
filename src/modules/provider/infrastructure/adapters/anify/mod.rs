mod adapter;

pub use adapter::{AnifyAdapter, DEFAULT_ANIFY_URL};
