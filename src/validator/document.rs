//! Combined structural and semantic validation

use super::schema::SchemaValidator;
use super::semantic::SemanticChecker;
use crate::config::ValidationSettings;
use crate::error::Result;
use crate::models::ValidationReport;
use crate::parser::{parse_document, parse_file, DocumentFormat};
use serde_json::Value as JsonValue;
use std::path::Path;

/// Runs the schema pass and, when enabled, the semantic pass
///
/// Semantic checks only run on documents that conform to the schema; a
/// structurally broken document cannot be loaded into the typed model.
#[derive(Debug)]
pub struct DocumentValidator {
    schema: SchemaValidator,
    semantic: Option<SemanticChecker>,
    strict: bool,
}

impl DocumentValidator {
    pub fn new(schema: SchemaValidator) -> Self {
        Self {
            schema,
            semantic: None,
            strict: false,
        }
    }

    /// Build from settings: schema override, format assertion, semantic and strict flags
    pub fn from_settings(settings: &ValidationSettings) -> Result<Self> {
        let schema = match &settings.schema {
            Some(path) => SchemaValidator::from_path(path, settings.validate_formats)?,
            None => SchemaValidator::bundled_with_formats(settings.validate_formats)?,
        };

        let validator = Self::new(schema).with_strict(settings.strict);
        Ok(if settings.semantic || settings.strict {
            validator.with_semantic(SemanticChecker::default())
        } else {
            validator
        })
    }

    pub fn with_semantic(mut self, checker: SemanticChecker) -> Self {
        self.semantic = Some(checker);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn schema_validator(&self) -> &SchemaValidator {
        &self.schema
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether a report counts as passing under this validator's mode
    pub fn passes(&self, report: &ValidationReport) -> bool {
        report.passes(self.strict)
    }

    pub fn validate_value(&self, document: &JsonValue, source: &str) -> Result<ValidationReport> {
        let report = self.schema.validate_value(document, source);

        match &self.semantic {
            Some(checker) if report.is_valid() => {
                let findings = checker.check_value(document)?;
                Ok(report.with_findings(findings))
            }
            _ => Ok(report),
        }
    }

    pub fn validate_str(
        &self,
        content: &str,
        format: DocumentFormat,
        source: &str,
    ) -> Result<ValidationReport> {
        let document = parse_document(content, format, source)?;
        self.validate_value(&document, source)
    }

    pub fn validate_file(&self, file_path: &Path) -> Result<ValidationReport> {
        let document = parse_file(file_path)?;
        self.validate_value(&document, &file_path.display().to_string())
    }
}
