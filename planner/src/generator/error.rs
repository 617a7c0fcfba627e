//! Generator error types

use thiserror::Error;

/// Errors that can occur while asking the generative service for content
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<GeneratorError> },
}

impl GeneratorError {
    /// Whether every retry was used up
    pub fn is_exhausted(&self) -> bool {
        matches!(self, GeneratorError::Exhausted { .. })
    }
}

impl From<handlebars::RenderError> for GeneratorError {
    fn from(e: handlebars::RenderError) -> Self {
        GeneratorError::Template(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_wraps_last_error() {
        let err = GeneratorError::Exhausted {
            attempts: 5,
            last: Box::new(GeneratorError::ApiError {
                status: 503,
                message: "overloaded".to_string(),
            }),
        };
        assert!(err.is_exhausted());
        let text = err.to_string();
        assert!(text.contains("5 attempts"));
        assert!(text.contains("503"));
    }

    #[test]
    fn test_plain_errors_are_not_exhausted() {
        assert!(!GeneratorError::InvalidResponse("empty".to_string()).is_exhausted());
    }
}
