//! Error types for pgfmt

use thiserror::Error;

/// Result type alias for pgfmt operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised while formatting values, templates and statements.
///
/// Every failure is a deterministic function of the input; nothing here is
/// worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Invalid shorthand column syntax, modifier or cast
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Positional variable beyond the supported maximum or the supplied values
    #[error("Range error: {0}")]
    Range(String),

    /// Wrong parameter shape or a value that cannot be formatted as requested
    #[error("Type error: {0}")]
    Type(String),

    /// Two columns with the same name in one column set
    #[error("Duplicate column name \"{0}\".")]
    DuplicateColumn(String),

    /// Named template variable with no matching property
    #[error("Property '{0}' doesn't exist.")]
    MissingProperty(String),

    /// Named template variable with an empty path segment
    #[error("Invalid property name '{0}'.")]
    InvalidProperty(String),

    /// Statement builder could not resolve a table name
    #[error("Table name is unknown.")]
    UnknownTable,

    /// Statement builder resolved an empty column list
    #[error("Cannot generate {0} without any columns.")]
    NoColumns(&'static str),

    /// A row inside a multi-row input is not an object
    #[error("Invalid {kind}object at index {index}.")]
    InvalidRow { kind: &'static str, index: usize },

    /// JSON encoding failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Failures raised by user callbacks
    #[error("{0}")]
    Other(String),
}

impl FormatError {
    /// Create a syntax error
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    /// Create a range error
    pub fn range(message: impl Into<String>) -> Self {
        Self::Range(message.into())
    }

    /// Create a type error
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    /// Create a free-form error, typically from inside a callback
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Check if this is a syntax error
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// Check if this is a range error
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range(_))
    }

    /// Check if this is a type error
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    /// Check if this is a duplicate column error
    pub fn is_duplicate_column(&self) -> bool {
        matches!(self, Self::DuplicateColumn(_))
    }

    /// Check if this is a missing property error
    pub fn is_missing_property(&self) -> bool {
        matches!(self, Self::MissingProperty(_))
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_domain_wording() {
        assert_eq!(
            FormatError::DuplicateColumn("x".into()).to_string(),
            "Duplicate column name \"x\"."
        );
        assert_eq!(
            FormatError::NoColumns("an INSERT").to_string(),
            "Cannot generate an INSERT without any columns."
        );
        assert_eq!(
            FormatError::InvalidRow { kind: "insert ", index: 2 }.to_string(),
            "Invalid insert object at index 2."
        );
        assert_eq!(
            FormatError::InvalidRow { kind: "", index: 0 }.to_string(),
            "Invalid object at index 0."
        );
    }

    #[test]
    fn predicates() {
        assert!(FormatError::range("x").is_range());
        assert!(FormatError::type_error("x").is_type());
        assert!(!FormatError::syntax("x").is_type());
    }
}
