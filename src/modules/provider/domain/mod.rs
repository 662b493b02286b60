pub mod entities;
pub mod repositories;
pub mod value_objects;

// Re-exports for easy access
pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
