//! Error types for agile documentation validation
//!
//! Structural violations are collected into a [`ValidationReport`](crate::models::ValidationReport);
//! the variants here are the failures that stop a validation call outright.

use crate::models::Violation;
use thiserror::Error;

/// Errors raised while loading schemas, parsing documents or querying documentation
#[derive(Debug, Error)]
pub enum DocsError {
    /// Input is not well-formed JSON or YAML
    #[error("Parse error in {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// The schema resource could not be read or is not JSON
    #[error("Failed to load schema: {0}")]
    SchemaLoad(String),

    /// The schema was read but does not compile as draft-07
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// Document failed one or more schema constraints
    #[error("Document does not conform to schema ({} violation(s))", .0.len())]
    Conformance(Vec<Violation>),

    /// Unknown topic, detail level or output format
    #[error("Invalid documentation query: {0}")]
    InvalidQuery(String),

    /// Configuration file is unreadable or not valid TOML
    #[error("Config error: {0}")]
    Config(String),

    #[error("Decision tree error: {0}")]
    DecisionTree(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocsError {
    /// Create a parse error for a named source
    pub fn parse(source_name: impl Into<String>, message: impl ToString) -> Self {
        DocsError::Parse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Errors that mean the crate itself is broken rather than the input
    pub fn is_packaging_defect(&self) -> bool {
        matches!(self, DocsError::SchemaLoad(_) | DocsError::Schema(_))
    }

    /// Violations carried by a conformance error, empty otherwise
    pub fn violations(&self) -> &[Violation] {
        match self {
            DocsError::Conformance(violations) => violations,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for DocsError {
    fn from(err: serde_json::Error) -> Self {
        DocsError::Serialize(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for DocsError {
    fn from(err: serde_yaml::Error) -> Self {
        DocsError::Serialize(format!("YAML error: {}", err))
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, DocsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = DocsError::parse("doc.json", "expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "Parse error in doc.json: expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_packaging_defect() {
        assert!(DocsError::SchemaLoad("missing".to_string()).is_packaging_defect());
        assert!(DocsError::Schema("bad type".to_string()).is_packaging_defect());
        assert!(!DocsError::parse("x", "y").is_packaging_defect());
    }

    #[test]
    fn test_conformance_counts_violations() {
        let err = DocsError::Conformance(vec![Violation::missing_property("", "metadata", None)]);
        assert_eq!(err.violations().len(), 1);
        assert!(err.to_string().contains("1 violation"));
        assert!(DocsError::InvalidQuery("x".to_string()).violations().is_empty());
    }
}
