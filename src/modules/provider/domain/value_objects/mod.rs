pub mod search_criteria;

pub use search_criteria::*;
