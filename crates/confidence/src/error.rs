use std::fmt;

use thiserror::Error;

/// Error codes reported in [`crate::FlagResolutionDetails::error_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotReady,
    FlagNotFound,
    ParseError,
    TypeMismatch,
    TargetingKeyMissing,
    InvalidContext,
    General,
    Timeout,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotReady => "NOT_READY",
            ErrorCode::FlagNotFound => "FLAG_NOT_FOUND",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::TargetingKeyMissing => "TARGETING_KEY_MISSING",
            ErrorCode::InvalidContext => "INVALID_CONTEXT",
            ErrorCode::General => "GENERAL",
            ErrorCode::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised inside the SDK.
///
/// Resolve operations never return these to the caller; they are folded into
/// a [`crate::FlagResolutionDetails`] carrying the default value. Name parsing,
/// context handling and client construction return them directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfidenceError {
    #[error("Flag not found: {0}")]
    FlagNotFound(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("General error: {0}")]
    General(String),
    /// A value path could not be followed into the resolved value.
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Targeting key missing: {0}")]
    TargetingKeyMissing(String),
    #[error("Invalid context: {0}")]
    InvalidContext(String),
    #[error("Not ready: {0}")]
    NotReady(String),
    /// A resource name did not have the expected `flags/...` shape.
    #[error("Invalid resource name: {0}")]
    Name(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ConfidenceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfidenceError::FlagNotFound(_) => ErrorCode::FlagNotFound,
            ConfidenceError::Timeout(_) => ErrorCode::Timeout,
            ConfidenceError::Parse(_) => ErrorCode::ParseError,
            ConfidenceError::TypeMismatch(_) => ErrorCode::TypeMismatch,
            ConfidenceError::TargetingKeyMissing(_) => ErrorCode::TargetingKeyMissing,
            ConfidenceError::InvalidContext(_) => ErrorCode::InvalidContext,
            ConfidenceError::NotReady(_) => ErrorCode::NotReady,
            ConfidenceError::General(_) | ConfidenceError::Name(_) | ConfidenceError::Config(_) => {
                ErrorCode::General
            }
        }
    }
}

impl From<reqwest::Error> for ConfidenceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ConfidenceError::Timeout(error.to_string())
        } else {
            ConfidenceError::General(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ConfidenceError {
    fn from(error: serde_json::Error) -> Self {
        ConfidenceError::General(format!("JSON parse error: {}", error))
    }
}

impl From<url::ParseError> for ConfidenceError {
    fn from(error: url::ParseError) -> Self {
        ConfidenceError::Config(format!("Invalid URL: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ConfidenceError::FlagNotFound("x".to_string()).code(),
            ErrorCode::FlagNotFound
        );
        assert_eq!(
            ConfidenceError::Timeout("x".to_string()).code(),
            ErrorCode::Timeout
        );
        assert_eq!(
            ConfidenceError::Parse("x".to_string()).code(),
            ErrorCode::ParseError
        );
        assert_eq!(
            ConfidenceError::Name("x".to_string()).code(),
            ErrorCode::General
        );
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FlagNotFound.to_string(), "FLAG_NOT_FOUND");
        assert_eq!(ErrorCode::TargetingKeyMissing.to_string(), "TARGETING_KEY_MISSING");
    }

    #[test]
    fn test_url_error_conversion() {
        let error: ConfidenceError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(error, ConfidenceError::Config(_)));
    }
}
