//! Error types and result aliases for the functrace library.
//!
//! This module defines the core error type [`FunctraceError`] and the [`Result`] type alias
//! used by everything that runs outside a traced call: building signatures, binding
//! arguments, formatting calls and durations. Errors raised around a traced call are
//! wrapped in [`TraceError`](crate::tracer::TraceError).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctraceError {
    #[error("Duration cannot be negative: {0} nanoseconds")]
    NegativeDuration(i64),

    #[error("Missing required argument: '{0}'")]
    MissingArgument(String),

    #[error("Too many positional arguments: expected at most {expected}, got {given}")]
    TooManyPositional { expected: usize, given: usize },

    #[error("Unexpected keyword argument: '{0}'")]
    UnexpectedKeyword(String),

    #[error("Multiple values for argument: '{0}'")]
    MultipleValues(String),

    #[error("Positional-only argument passed as keyword: '{0}'")]
    PositionalOnlyAsKeyword(String),

    #[error("Keyword argument repeated: '{0}'")]
    DuplicateKeyword(String),

    #[error("Duplicate parameter name: '{0}'")]
    DuplicateParameter(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Unknown placeholder in call pattern: '{{{0}}}'")]
    UnknownPlaceholder(String),
}

impl FunctraceError {
    /// Whether this error comes from binding call-site arguments to a signature
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            FunctraceError::MissingArgument(_)
                | FunctraceError::TooManyPositional { .. }
                | FunctraceError::UnexpectedKeyword(_)
                | FunctraceError::MultipleValues(_)
                | FunctraceError::PositionalOnlyAsKeyword(_)
                | FunctraceError::DuplicateKeyword(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FunctraceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_duration_display() {
        let err = FunctraceError::NegativeDuration(-5);
        assert_eq!(err.to_string(), "Duration cannot be negative: -5 nanoseconds");
    }

    #[test]
    fn test_missing_argument_display() {
        let err = FunctraceError::MissingArgument("b".to_string());
        assert_eq!(err.to_string(), "Missing required argument: 'b'");
    }

    #[test]
    fn test_too_many_positional_display() {
        let err = FunctraceError::TooManyPositional {
            expected: 2,
            given: 3,
        };
        assert_eq!(err.to_string(), "Too many positional arguments: expected at most 2, got 3");
    }

    #[test]
    fn test_unknown_placeholder_display() {
        let err = FunctraceError::UnknownPlaceholder("path".to_string());
        assert_eq!(err.to_string(), "Unknown placeholder in call pattern: '{path}'");
    }

    #[test]
    fn test_is_binding_error() {
        assert!(FunctraceError::MissingArgument("a".to_string()).is_binding_error());
        assert!(FunctraceError::DuplicateKeyword("a".to_string()).is_binding_error());
        assert!(!FunctraceError::NegativeDuration(-1).is_binding_error());
        assert!(!FunctraceError::DuplicateParameter("a".to_string()).is_binding_error());
    }

    #[test]
    fn test_error_debug() {
        let err = FunctraceError::UnexpectedKeyword("z".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("UnexpectedKeyword"));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: Result<i32> = Err(FunctraceError::MissingArgument("a".to_string()));
        assert!(err_result.is_err());
    }
}
