use super::location::{dotted_path, join_pointer};
use crate::error::{DocsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Severity level for violations and findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// High severity - document is unusable as-is
    High,
    /// Medium severity - warning, should be fixed
    Medium,
    /// Low severity - informational, nice to fix
    Low,
}

impl Severity {
    /// Get display symbol for severity
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::High => "🔴",
            Severity::Medium => "🟡",
            Severity::Low => "🔵",
        }
    }

    /// Get display name for severity
    pub fn name(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

/// Category of a violation or semantic finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// A `required` property is absent
    MissingField,
    /// Value has the wrong JSON type
    TypeMismatch,
    /// Value is outside an `enum` or otherwise not allowed
    InvalidValue,
    /// String does not match its declared `format`
    InvalidFormat,
    /// Any other structural keyword failure
    InvalidStructure,
    /// Reference to a node that does not exist
    BrokenReference,
    /// Identifier declared more than once
    DuplicateId,
    /// Tool name missing from the catalog
    UnknownTool,
    /// Sequence or scale out of order
    Ordering,
    /// schema_version incompatible with the bundled schema
    VersionMismatch,
}

impl ViolationCategory {
    /// Get display name for category
    pub fn name(&self) -> &'static str {
        match self {
            ViolationCategory::MissingField => "Missing Field",
            ViolationCategory::TypeMismatch => "Type Mismatch",
            ViolationCategory::InvalidValue => "Invalid Value",
            ViolationCategory::InvalidFormat => "Invalid Format",
            ViolationCategory::InvalidStructure => "Invalid Structure",
            ViolationCategory::BrokenReference => "Broken Reference",
            ViolationCategory::DuplicateId => "Duplicate Id",
            ViolationCategory::UnknownTool => "Unknown Tool",
            ViolationCategory::Ordering => "Ordering",
            ViolationCategory::VersionMismatch => "Version Mismatch",
        }
    }

    /// Map a failing schema keyword to a category
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "required" => ViolationCategory::MissingField,
            "type" => ViolationCategory::TypeMismatch,
            "enum" | "const" => ViolationCategory::InvalidValue,
            "format" => ViolationCategory::InvalidFormat,
            _ => ViolationCategory::InvalidStructure,
        }
    }
}

/// A structural schema violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path to the failing value, e.g. `methodologies.scrum.events[2].outcomes`
    pub path: String,
    /// Same location as a JSON pointer
    pub pointer: String,
    /// Schema keyword that failed
    pub keyword: String,
    /// Human-readable constraint
    pub expected: String,
    /// Offending value, absent for missing properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<JsonValue>,
    pub message: String,
    pub severity: Severity,
    pub category: ViolationCategory,
}

impl Violation {
    /// A `required` property missing from the object at `parent_pointer`
    ///
    /// The reported path names the missing key itself. Pass the document so
    /// numeric object keys are not mistaken for array indices.
    pub fn missing_property(
        parent_pointer: &str,
        property: &str,
        document: Option<&JsonValue>,
    ) -> Self {
        let pointer = join_pointer(parent_pointer, property);
        let path = dotted_path(&pointer, document);
        Self {
            message: format!("Missing required field: {}", path),
            path,
            pointer,
            keyword: "required".to_string(),
            expected: format!("required property \"{}\"", property),
            actual: None,
            severity: Severity::High,
            category: ViolationCategory::MissingField,
        }
    }

    /// Format violation for display
    pub fn format(&self) -> String {
        format!(
            "{} [{}] {} - {}",
            self.severity.symbol(),
            self.severity.name(),
            self.path,
            self.message
        )
    }
}

/// A referential or ordering problem outside the schema's structural model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticFinding {
    pub path: String,
    pub message: String,
    pub severity: Severity,
    pub category: ViolationCategory,
}

impl SemanticFinding {
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        category: ViolationCategory,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity,
            category,
        }
    }

    /// Format finding for display
    pub fn format(&self) -> String {
        format!(
            "{} [{}] {} - {} ({})",
            self.severity.symbol(),
            self.severity.name(),
            self.path,
            self.message,
            self.category.name()
        )
    }
}

/// Result of validating one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// File path or label of the validated input
    pub source: String,
    /// Structural violations, sorted by pointer
    pub violations: Vec<Violation>,
    /// Semantic findings, empty unless the semantic pass ran
    #[serde(default)]
    pub findings: Vec<SemanticFinding>,
    pub checked_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Create a report, ordering violations deterministically
    pub fn new(source: impl Into<String>, mut violations: Vec<Violation>) -> Self {
        violations.sort_by(|a, b| {
            a.pointer
                .cmp(&b.pointer)
                .then_with(|| a.keyword.cmp(&b.keyword))
                .then_with(|| a.message.cmp(&b.message))
        });
        Self {
            source: source.into(),
            violations,
            findings: Vec::new(),
            checked_at: Utc::now(),
        }
    }

    /// Attach semantic findings to the report
    pub fn with_findings(mut self, findings: Vec<SemanticFinding>) -> Self {
        self.findings = findings;
        self
    }

    /// Structural conformance: no violations at all
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Conformance plus, in strict mode, no high-severity semantic findings
    pub fn passes(&self, strict: bool) -> bool {
        self.is_valid()
            && (!strict || !self.findings.iter().any(|f| f.severity == Severity::High))
    }

    /// Check whether a violation is reported at the given dotted path
    pub fn has_violation_at(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }

    /// Count semantic findings by severity
    pub fn count_findings(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    /// Turn a failing report into a conformance error carrying every violation
    pub fn ensure_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DocsError::Conformance(self.violations.clone()))
        }
    }

    /// Format all violations and findings for display
    pub fn format_errors(&self) -> String {
        self.violations
            .iter()
            .map(|v| v.format())
            .chain(self.findings.iter().map(|f| f.format()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_property_path_names_key() {
        let v = Violation::missing_property("/workflow_patterns/0/steps/1", "tool", None);
        assert_eq!(v.path, "workflow_patterns[0].steps[1].tool");
        assert_eq!(v.pointer, "/workflow_patterns/0/steps/1/tool");
        assert_eq!(v.keyword, "required");
        assert!(v.actual.is_none());
        assert_eq!(v.category, ViolationCategory::MissingField);
    }

    #[test]
    fn test_report_sorted_and_valid_flags() {
        let report = ValidationReport::new(
            "doc.json",
            vec![
                Violation::missing_property("", "tools", None),
                Violation::missing_property("", "metadata", None),
            ],
        );
        assert!(!report.is_valid());
        assert_eq!(report.violations[0].path, "metadata");
        assert!(report.has_violation_at("tools"));
        assert!(report.ensure_valid().is_err());
    }

    #[test]
    fn test_strict_mode_considers_high_findings() {
        let report = ValidationReport::new("doc.json", vec![]).with_findings(vec![
            SemanticFinding::new(
                "decision_trees[0].nodes[0].options[0].next_node",
                "Unknown node 'missing'",
                Severity::High,
                ViolationCategory::BrokenReference,
            ),
        ]);
        assert!(report.is_valid());
        assert!(report.passes(false));
        assert!(!report.passes(true));
        assert_eq!(report.count_findings(Severity::High), 1);
    }

    #[test]
    fn test_category_from_keyword() {
        assert_eq!(ViolationCategory::from_keyword("required"), ViolationCategory::MissingField);
        assert_eq!(ViolationCategory::from_keyword("type"), ViolationCategory::TypeMismatch);
        assert_eq!(ViolationCategory::from_keyword("enum"), ViolationCategory::InvalidValue);
        assert_eq!(ViolationCategory::from_keyword("format"), ViolationCategory::InvalidFormat);
        assert_eq!(ViolationCategory::from_keyword("minItems"), ViolationCategory::InvalidStructure);
    }

    #[test]
    fn test_format_includes_severity_and_path() {
        let v = Violation::missing_property("", "metadata", None);
        let line = v.format();
        assert!(line.contains("[HIGH]"));
        assert!(line.contains("metadata"));
    }
}
