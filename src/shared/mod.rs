// Shared kernel: cross-context errors, configuration, logging and pagination

pub mod application; // Shared application layer patterns
pub mod config; // Environment-driven configuration
pub mod errors; // Shared error types
pub mod utils; // Shared utilities

pub use config::AppConfig;
pub use errors::{AppError, AppResult};
