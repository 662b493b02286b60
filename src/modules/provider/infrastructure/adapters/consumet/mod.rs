mod adapter;

pub use adapter::{ConsumetAdapter, DEFAULT_CONSUMET_URL};
