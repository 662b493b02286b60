use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Mapping error: {0}")]
    MappingError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Whether the failure should be absorbed as "no data from this provider".
    ///
    /// Transport, rate-limit and upstream-shape failures degrade to empty
    /// results; anything internal to this process surfaces to the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::ApiError(_)
            | AppError::NotFound(_)
            | AppError::RateLimitError(_)
            | AppError::SerializationError(_)
            | AppError::MappingError(_)
            | AppError::ExternalServiceError(_) => true,
            AppError::InvalidInput(_) | AppError::InternalError(_) | AppError::ConfigError(_) => {
                false
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::ExternalServiceError("Request timeout".to_string())
        } else if err.is_connect() {
            AppError::ExternalServiceError("Failed to connect to external service".to_string())
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                429 => AppError::RateLimitError("Too many requests".to_string()),
                404 => AppError::NotFound("External resource not found".to_string()),
                _ => AppError::ApiError(format!("HTTP {}: {}", status, err)),
            }
        } else {
            AppError::ApiError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::InvalidInput(format!("Invalid number: {}", err))
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failures_are_recoverable() {
        assert!(AppError::ExternalServiceError("timeout".into()).is_recoverable());
        assert!(AppError::RateLimitError("429".into()).is_recoverable());
        assert!(AppError::SerializationError("bad json".into()).is_recoverable());
    }

    #[test]
    fn test_internal_failures_surface() {
        assert!(!AppError::InternalError("boom".into()).is_recoverable());
        assert!(!AppError::ConfigError("FETCH_TIMEOUT_MS".into()).is_recoverable());
    }

    #[test]
    fn test_serializes_as_tagged_object() {
        let json = serde_json::to_value(AppError::NotFound("anime 1".into())).unwrap();
        assert_eq!(json["type"], "NotFound");
        assert_eq!(json["message"], "anime 1");
    }

    #[test]
    fn test_parse_int_error_maps_to_invalid_input() {
        let err: AppError = "abc".parse::<u32>().unwrap_err().into();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
