//! Integration tests for structural and semantic validation
//!
//! These tests exercise the bundled schema end to end: required keys at
//! every level, format assertion, JSON/YAML parity and the semantic pass.

use agile_docs::models::{AgileDocumentation, Severity, ViolationCategory};
use agile_docs::parser::DocumentFormat;
use agile_docs::validator::{DocumentValidator, SchemaValidator, SemanticChecker};
use agile_docs::{DocsError, ValidationSettings};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

const TOP_LEVEL_KEYS: [&str; 7] = [
    "metadata",
    "agile_principles",
    "methodologies",
    "workflow_patterns",
    "tools",
    "best_practices",
    "decision_trees",
];

/// Smallest document that satisfies every required field
fn minimal_document() -> Value {
    json!({
        "metadata": {"version": "1.0", "schema_version": "1.0"},
        "agile_principles": {
            "manifesto": {
                "values": [{
                    "primary": "Individuals and interactions",
                    "secondary": "processes and tools",
                    "explanation": "People solve problems; tools support them"
                }],
                "principles": [{
                    "name": "Customer satisfaction",
                    "description": "Deliver valuable software early and continuously",
                    "practical_application": "Ship a usable increment every sprint"
                }]
            }
        },
        "methodologies": {
            "scrum": {
                "roles": [{"name": "Product Owner", "responsibilities": ["Order the backlog"]}],
                "events": [{
                    "name": "Sprint Planning",
                    "purpose": "Plan the sprint",
                    "duration": "Up to 8 hours",
                    "participants": ["Scrum Team"],
                    "outcomes": ["Sprint Goal"]
                }],
                "artifacts": [{
                    "name": "Product Backlog",
                    "description": "Ordered list of work",
                    "owner": "Product Owner"
                }]
            }
        },
        "workflow_patterns": [],
        "tools": {"categories": []},
        "best_practices": {
            "story_writing": [],
            "sprint_planning": [],
            "estimation": {"techniques": [], "story_points_scale": []}
        },
        "decision_trees": []
    })
}

fn bundled_document() -> Value {
    serde_json::from_str(agile_docs::services::BUNDLED_DOCUMENTATION).unwrap()
}

// =========================================================================
// Structural validation
// =========================================================================

#[test]
fn test_minimal_document_is_valid() {
    let validator = SchemaValidator::bundled().unwrap();
    let report = validator.validate_value(&minimal_document(), "minimal");
    assert!(report.is_valid(), "{}", report.format_errors());
    assert!(report.violations.is_empty());
}

#[test]
fn test_each_missing_top_level_key_is_reported() {
    let validator = SchemaValidator::bundled().unwrap();

    for key in TOP_LEVEL_KEYS {
        let mut doc = minimal_document();
        doc.as_object_mut().unwrap().remove(key);

        let report = validator.validate_value(&doc, "minimal");
        assert!(!report.is_valid(), "missing {} should fail", key);
        assert!(report.has_violation_at(key), "no violation at {}", key);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].category, ViolationCategory::MissingField);
    }
}

#[test]
fn test_step_tool_violation_disappears_when_added() {
    let validator = SchemaValidator::bundled().unwrap();
    let mut doc = minimal_document();
    doc["workflow_patterns"] = json!([{
        "name": "Story Creation",
        "description": "Create a story",
        "steps": [
            {"sequence": 1, "action": "Check the project", "tool": "get_project"},
            {"sequence": 2, "action": "Create the story"}
        ]
    }]);

    let report = validator.validate_value(&doc, "doc");
    assert!(report.has_violation_at("workflow_patterns[0].steps[1].tool"));
    let violation = &report.violations[0];
    assert_eq!(violation.expected, "required property \"tool\"");
    assert!(violation.actual.is_none());

    doc["workflow_patterns"][0]["steps"][1]["tool"] = json!("create_story");
    let report = validator.validate_value(&doc, "doc");
    assert!(!report.has_violation_at("workflow_patterns[0].steps[1].tool"));
    assert!(report.is_valid());
}

#[test]
fn test_nested_type_mismatch_path() {
    let validator = SchemaValidator::bundled().unwrap();
    let mut doc = minimal_document();
    doc["methodologies"]["scrum"]["events"][0]["outcomes"] = json!("Sprint Goal");

    let report = validator.validate_value(&doc, "doc");
    assert_eq!(report.violations.len(), 1);
    let violation = &report.violations[0];
    assert_eq!(violation.path, "methodologies.scrum.events[0].outcomes");
    assert_eq!(violation.keyword, "type");
    assert_eq!(violation.expected, "type \"array\"");
    assert_eq!(violation.actual, Some(json!("Sprint Goal")));
    assert_eq!(violation.severity, Severity::High);
}

#[test]
fn test_terminal_option_without_action_is_valid() {
    let validator = SchemaValidator::bundled().unwrap();
    let mut doc = minimal_document();
    doc["decision_trees"] = json!([{
        "name": "Done?",
        "root_question": "Is the story done?",
        "nodes": [{
            "id": "done",
            "question": "Does it meet the Definition of Done?",
            "options": [{"condition": "Yes", "next_node": "END"}]
        }]
    }]);

    let report = validator.validate_value(&doc, "doc");
    assert!(report.is_valid(), "{}", report.format_errors());
}

#[test]
fn test_unknown_properties_tolerated() {
    let validator = SchemaValidator::bundled().unwrap();
    let mut doc = minimal_document();
    doc["x-owner"] = json!("platform team");
    doc["metadata"]["reviewed_by"] = json!(["alice"]);

    assert!(validator.validate_value(&doc, "doc").is_valid());
}

#[test]
fn test_all_violations_collected() {
    let validator = SchemaValidator::bundled().unwrap();
    let report = validator.validate_value(&json!({"metadata": {}}), "doc");

    // six missing top-level keys plus two missing metadata fields
    assert_eq!(report.violations.len(), 8);
    assert!(report.has_violation_at("metadata.version"));
    assert!(report.has_violation_at("metadata.schema_version"));

    let err = report.ensure_valid().unwrap_err();
    assert_eq!(err.violations().len(), 8);
}

#[test]
fn test_date_time_format_assertion_is_opt_in() {
    let mut doc = minimal_document();
    doc["metadata"]["created_at"] = json!("last tuesday");

    let lenient = SchemaValidator::bundled().unwrap();
    assert!(lenient.validate_value(&doc, "doc").is_valid());

    let strict = SchemaValidator::bundled_with_formats(true).unwrap();
    let report = strict.validate_value(&doc, "doc");
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].path, "metadata.created_at");
    assert_eq!(report.violations[0].category, ViolationCategory::InvalidFormat);
}

#[test]
fn test_yaml_and_json_reports_match() {
    let validator = SchemaValidator::bundled().unwrap();
    let mut doc = minimal_document();
    doc.as_object_mut().unwrap().remove("tools");
    doc["methodologies"]["scrum"]["roles"][0]["responsibilities"] = json!(42);

    let json_text = serde_json::to_string_pretty(&doc).unwrap();
    let yaml_text = serde_yaml::to_string(&doc).unwrap();

    let from_json = validator
        .validate_str(&json_text, DocumentFormat::Json, "doc")
        .unwrap();
    let from_yaml = validator
        .validate_str(&yaml_text, DocumentFormat::Yaml, "doc")
        .unwrap();

    assert_eq!(from_json.violations.len(), 2);
    assert_eq!(from_json.violations, from_yaml.violations);
}

#[test]
fn test_malformed_input_is_parse_error() {
    let validator = SchemaValidator::bundled().unwrap();
    let err = validator
        .validate_str("{\"metadata\": ", DocumentFormat::Json, "broken.json")
        .unwrap_err();
    assert!(matches!(err, DocsError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_round_trip_through_typed_model() {
    let validator = SchemaValidator::bundled().unwrap();

    for value in [minimal_document(), bundled_document()] {
        let typed = AgileDocumentation::from_value(&value).unwrap();
        let text = typed.to_json_pretty().unwrap();
        let report = validator
            .validate_str(&text, DocumentFormat::Json, "round-trip")
            .unwrap();
        assert!(report.is_valid(), "{}", report.format_errors());
    }
}

// =========================================================================
// Files, custom schemas and settings
// =========================================================================

#[test]
fn test_validate_yaml_file_with_crlf_and_bom() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("docs.yml");
    let yaml = serde_yaml::to_string(&minimal_document()).unwrap();
    fs::write(&path, format!("\u{FEFF}{}", yaml.replace('\n', "\r\n"))).unwrap();

    let validator = SchemaValidator::bundled().unwrap();
    let report = validator.validate_file(&path).unwrap();
    assert!(report.is_valid(), "{}", report.format_errors());
    assert!(report.source.ends_with("docs.yml"));
}

#[test]
fn test_custom_schema_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let schema_path = temp_dir.path().join("custom.schema.json");
    fs::write(
        &schema_path,
        r#"{"$schema": "http://json-schema.org/draft-07/schema#", "type": "object", "required": ["owner"]}"#,
    )
    .unwrap();

    let settings = ValidationSettings {
        schema: Some(schema_path),
        ..Default::default()
    };
    let validator = DocumentValidator::from_settings(&settings).unwrap();
    let report = validator.validate_value(&json!({}), "doc").unwrap();
    assert!(report.has_violation_at("owner"));
}

#[test]
fn test_unreadable_schema_is_load_error() {
    let temp_dir = TempDir::new().unwrap();
    let schema_path = temp_dir.path().join("broken.schema.json");
    fs::write(&schema_path, "not json").unwrap();

    let err = SchemaValidator::from_path(&schema_path, false).unwrap_err();
    assert!(matches!(err, DocsError::SchemaLoad(_)));
    assert!(err.is_packaging_defect());
}

// =========================================================================
// Semantic checks
// =========================================================================

#[test]
fn test_bundled_documentation_passes_semantic_checks() {
    let findings = SemanticChecker::default()
        .check_value(&bundled_document())
        .unwrap();
    assert!(findings.is_empty(), "{:?}", findings);
}

#[test]
fn test_dangling_next_node_only_found_semantically() {
    let mut doc = bundled_document();
    doc["decision_trees"][1]["nodes"][0]["options"][0]["next_node"] = json!("missing_node");

    let structural = SchemaValidator::bundled().unwrap();
    assert!(structural.validate_value(&doc, "doc").is_valid());

    let findings = SemanticChecker::default().check_value(&doc).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].path, "decision_trees[1].nodes[0].options[0].next_node");
    assert_eq!(findings[0].category, ViolationCategory::BrokenReference);
}

#[test]
fn test_unknown_tool_reference_is_medium() {
    let mut doc = bundled_document();
    doc["workflow_patterns"][0]["steps"][0]["tool"] = json!("launch_rocket");

    let settings = ValidationSettings::default().with_flags(false, true, false, None);
    let validator = DocumentValidator::from_settings(&settings).unwrap();
    let report = validator.validate_value(&doc, "doc").unwrap();

    assert!(report.is_valid());
    assert_eq!(report.count_findings(Severity::Medium), 1);
    assert_eq!(report.findings[0].category, ViolationCategory::UnknownTool);
    assert!(report.passes(true), "medium findings do not fail strict mode");
}

#[test]
fn test_integer_valued_sequences_load_for_semantic_pass() {
    let settings = ValidationSettings::default().with_flags(false, true, false, None);
    let validator = DocumentValidator::from_settings(&settings).unwrap();

    for sequence in [json!(1.0), json!(10000000000000000000_u64)] {
        let mut doc = bundled_document();
        doc["workflow_patterns"][0]["steps"][0]["sequence"] = sequence.clone();

        let report = validator.validate_value(&doc, "doc").unwrap();
        assert!(report.is_valid(), "{}: {}", sequence, report.format_errors());
        assert_eq!(report.count_findings(Severity::High), 0);
    }
}
