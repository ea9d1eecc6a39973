//! JSON Schema Validation for agile documentation
//!
//! Compiles the draft-07 agile documentation schema once and validates
//! documents against it, collecting every violation instead of stopping at
//! the first.

use crate::error::{DocsError, Result};
use crate::models::location::dotted_path;
use crate::models::{Severity, ValidationReport, Violation, ViolationCategory};
use crate::parser::{parse_document, parse_file, DocumentFormat};
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Validator};
use serde_json::Value as JsonValue;
use std::path::Path;
use tracing::debug;

/// Schema shipped with the crate
pub const BUNDLED_SCHEMA: &str = include_str!("../../schemas/agile_documentation.schema.json");

/// Version of the bundled schema, compared against `metadata.schema_version`
pub const BUNDLED_SCHEMA_VERSION: &str = "1.0";

/// Parse the bundled schema text
pub fn bundled_schema() -> Result<JsonValue> {
    serde_json::from_str(BUNDLED_SCHEMA)
        .map_err(|e| DocsError::SchemaLoad(format!("bundled schema is not valid JSON: {}", e)))
}

/// Compiled draft-07 validator plus the schema it was built from
pub struct SchemaValidator {
    schema: JsonValue,
    validator: Validator,
    validate_formats: bool,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_id", &self.schema.get("$id"))
            .field("validate_formats", &self.validate_formats)
            .finish()
    }
}

impl SchemaValidator {
    /// Validator for the bundled schema, formats treated as annotations
    pub fn bundled() -> Result<Self> {
        Self::from_schema_value(bundled_schema()?, false)
    }

    /// Validator for the bundled schema with optional format assertion
    pub fn bundled_with_formats(validate_formats: bool) -> Result<Self> {
        Self::from_schema_value(bundled_schema()?, validate_formats)
    }

    /// Load and compile a schema file
    pub fn from_path(schema_path: &Path, validate_formats: bool) -> Result<Self> {
        let schema_content = std::fs::read_to_string(schema_path).map_err(|e| {
            DocsError::SchemaLoad(format!("cannot read {}: {}", schema_path.display(), e))
        })?;

        let schema: JsonValue = serde_json::from_str(&schema_content).map_err(|e| {
            DocsError::SchemaLoad(format!("cannot parse {}: {}", schema_path.display(), e))
        })?;

        Self::from_schema_value(schema, validate_formats)
    }

    /// Compile a schema value using draft-07 semantics
    pub fn from_schema_value(schema: JsonValue, validate_formats: bool) -> Result<Self> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .should_validate_formats(validate_formats)
            .build(&schema)
            .map_err(|e| DocsError::Schema(e.to_string()))?;

        debug!(validate_formats, "compiled agile documentation schema");

        Ok(Self {
            schema,
            validator,
            validate_formats,
        })
    }

    pub fn schema(&self) -> &JsonValue {
        &self.schema
    }

    pub fn validates_formats(&self) -> bool {
        self.validate_formats
    }

    /// Fast conformance check without building a report
    pub fn is_valid(&self, document: &JsonValue) -> bool {
        self.validator.is_valid(document)
    }

    /// Validate an in-memory document
    pub fn validate_value(&self, document: &JsonValue, source: &str) -> ValidationReport {
        // Run validation using iter_errors to get all validation errors
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(document)
            .map(|error| self.to_violation(&error, document))
            .collect();

        debug!(source, violations = violations.len(), "validated document");
        ValidationReport::new(source, violations)
    }

    /// Parse then validate document text
    pub fn validate_str(
        &self,
        content: &str,
        format: DocumentFormat,
        source: &str,
    ) -> Result<ValidationReport> {
        let document = parse_document(content, format, source)?;
        Ok(self.validate_value(&document, source))
    }

    /// Read, parse and validate a file; format comes from its extension
    pub fn validate_file(&self, file_path: &Path) -> Result<ValidationReport> {
        let document = parse_file(file_path)?;
        Ok(self.validate_value(&document, &file_path.display().to_string()))
    }

    fn to_violation(&self, error: &jsonschema::ValidationError<'_>, document: &JsonValue) -> Violation {
        let instance_pointer = error.instance_path.to_string();
        let schema_pointer = error.schema_path.to_string();

        if let ValidationErrorKind::Required { property } = &error.kind {
            let name = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            return Violation::missing_property(&instance_pointer, &name, Some(document));
        }

        let keyword = schema_pointer
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        Violation {
            path: dotted_path(&instance_pointer, Some(document)),
            pointer: instance_pointer,
            expected: self.describe_constraint(&keyword, &schema_pointer),
            actual: Some(error.instance.clone().into_owned()),
            message: error.to_string(),
            severity: Severity::High,
            category: ViolationCategory::from_keyword(&keyword),
            keyword,
        }
    }

    /// Describe the constraint at a schema location, e.g. `type "string"`
    fn describe_constraint(&self, keyword: &str, schema_pointer: &str) -> String {
        match self.schema.pointer(schema_pointer) {
            Some(constraint) => match keyword {
                "type" => format!("type {}", constraint),
                "enum" => format!("one of {}", constraint),
                "format" => format!("format {}", constraint),
                _ => format!("{} {}", keyword, constraint),
            },
            None => keyword.to_string(),
        }
    }
}
