pub mod anime;
pub mod catalog;
pub mod provider;
