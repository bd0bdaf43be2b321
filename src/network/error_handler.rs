//! Centralized error handling and classification

use crate::backend::error::BackendError;
use crate::logging::LogLevel;

/// Centralized error handler for all backend reads
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn new() -> Self {
        Self
    }

    /// Classify error and determine appropriate log level
    pub fn classify_error(&self, error: &BackendError) -> LogLevel {
        match error {
            // Server errors - temporary issues
            BackendError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Wrong route or base URL - needs attention
            BackendError::Http { status, .. } if *status == 404 => LogLevel::Error,

            // Backend has no data yet
            BackendError::Api(_) => LogLevel::Warn,

            // Payload shape changed
            BackendError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            BackendError::Reqwest(_) => LogLevel::Warn,

            // Other errors
            _ => LogLevel::Warn,
        }
    }

    /// Short, user-facing description of the failure
    pub fn describe(&self, error: &BackendError) -> String {
        match error {
            BackendError::Reqwest(e) if e.is_timeout() => "request timed out".to_string(),
            BackendError::Reqwest(e) if e.is_connect() => "backend unreachable".to_string(),
            BackendError::Reqwest(_) => "network error".to_string(),
            BackendError::Http { status, .. } => format!("HTTP {}", status),
            BackendError::Api(message) => message.clone(),
            BackendError::Decode(_) => "unexpected response shape".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_http_errors() {
        let handler = ErrorHandler::new();
        let server = BackendError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        let missing = BackendError::Http {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(handler.classify_error(&server), LogLevel::Warn);
        assert_eq!(handler.classify_error(&missing), LogLevel::Error);
    }

    #[test]
    fn test_classify_payload_errors() {
        let handler = ErrorHandler::new();
        let api = BackendError::Api("No data available".to_string());
        let decode = BackendError::Decode(serde_json::from_str::<u8>("x").unwrap_err());
        assert_eq!(handler.classify_error(&api), LogLevel::Warn);
        assert_eq!(handler.classify_error(&decode), LogLevel::Error);
        assert_eq!(handler.describe(&api), "No data available");
        assert_eq!(handler.describe(&decode), "unexpected response shape");
    }
}
