use env_logger::Env;
use log::{debug, info, warn};
use std::sync::Once;
use std::time::Instant;

use crate::shared::errors::AppError;

static INIT: Once = Once::new();

/// Initialize the logging system
/// This should be called once at application startup; `RUST_LOG` overrides
/// the defaults below.
pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .filter_module("miru_catalog", log::LevelFilter::Debug)
            .filter_module("reqwest", log::LevelFilter::Warn) // Reduce HTTP noise
            .filter_module("hyper", log::LevelFilter::Warn)
            .filter_module("tokio", log::LevelFilter::Warn)
            .format_timestamp_millis()
            .format_target(false)
            .init();

        info!("Logging system initialized");
    });
}

/// Structured logging helpers for the catalog's recurring events
pub struct LogContext;

impl LogContext {
    /// Upstream request lifecycle; `status` is absent before the response
    pub fn api_call(provider: &str, url: &str, status: Option<u16>, duration_ms: Option<u64>) {
        match (status, duration_ms) {
            (Some(status), Some(duration)) => {
                info!("API: {} {} -> {} in {}ms", provider, url, status, duration)
            }
            (Some(status), None) => info!("API: {} {} -> {}", provider, url, status),
            _ => debug!("API: {} {}", provider, url),
        }
    }

    /// Facade query served, with the number of items returned
    pub fn catalog_query(operation: &str, detail: &str, results: usize, cached: bool) {
        let source = if cached { "cache" } else { "upstream" };
        info!(
            "Catalog: {} [{}] returned {} items from {}",
            operation, detail, results, source
        );
    }

    /// A secondary source is being tried because the previous one had nothing
    pub fn provider_fallback(operation: &str, from: &str, to: &str) {
        info!("Catalog: {} falling back from {} to {}", operation, from, to);
    }

    /// A provider failure that was absorbed into an empty result
    pub fn provider_failure(operation: &str, provider: &str, error: &AppError) {
        warn!("Catalog: {} via {} degraded to empty: {}", operation, provider, error);
    }
}

/// Helper for timing operations
pub struct TimedOperation {
    start: Instant,
    operation: String,
}

impl TimedOperation {
    pub fn new(operation: &str) -> Self {
        debug!("Starting: {}", operation);
        Self {
            start: Instant::now(),
            operation: operation.to_string(),
        }
    }

    pub fn finish(self) -> u64 {
        let duration = self.start.elapsed().as_millis() as u64;
        debug!("Performance: {} took {}ms", self.operation, duration);
        duration
    }

    pub fn finish_with_info(self, info: &str) -> u64 {
        let duration = self.start.elapsed().as_millis() as u64;
        info!("Performance: {} took {}ms ({})", self.operation, duration, info);
        duration
    }
}
