// Agile Docs - Schema validation for agile methodology documentation
// Validates documentation documents against a bundled draft-07 schema and serves
// the bundled documentation to agents and humans.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod services;
pub mod validator;

pub use error::{DocsError, Result};

// Re-export commonly used types
pub use config::{DocsConfig, ValidationSettings};
pub use models::{
    AgileDocumentation, SemanticFinding, Severity, ValidationReport, Violation, ViolationCategory,
};
pub use parser::DocumentFormat;
pub use services::{DetailLevel, DocumentationQuery, DocumentationService, Topic};
pub use validator::{DocumentValidator, SchemaValidator, SemanticChecker};
