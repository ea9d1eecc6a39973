//! Typed model of an agile documentation document
//!
//! Mirrors the bundled schema: required fields are plain fields, optional
//! fields are `Option` or skipped when empty. Unknown top-level keys are kept
//! in [`AgileDocumentation::extra`] so a round trip does not drop them.

use crate::error::{DocsError, Result};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Marker used by decision-tree options that end the walk
pub const TERMINAL_NODE: &str = "END";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgileDocumentation {
    pub metadata: Metadata,
    pub agile_principles: AgilePrinciples,
    pub methodologies: Methodologies,
    pub workflow_patterns: Vec<WorkflowPattern>,
    pub tools: ToolCatalog,
    pub best_practices: BestPractices,
    pub decision_trees: Vec<DecisionTree>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl AgileDocumentation {
    /// Deserialize from an already parsed JSON value
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| DocsError::parse("document", format!("does not match the data model: {}", e)))
    }

    pub fn to_value(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serialize to pretty-printed JSON text
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// All tools across every catalog category
    pub fn all_tools(&self) -> impl Iterator<Item = &ToolEntry> {
        self.tools.categories.iter().flat_map(|c| c.tools.iter())
    }

    /// Tool names in catalog order
    pub fn tool_names(&self) -> Vec<&str> {
        self.all_tools().map(|t| t.name.as_str()).collect()
    }

    pub fn find_tool(&self, name: &str) -> Option<&ToolEntry> {
        self.all_tools().find(|t| t.name == name)
    }

    pub fn find_workflow(&self, name: &str) -> Option<&WorkflowPattern> {
        self.workflow_patterns
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(name))
    }

    pub fn find_decision_tree(&self, name: &str) -> Option<&DecisionTree> {
        self.decision_trees
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

// =============================================================================
// Metadata
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    pub schema_version: String,
    /// RFC 3339 timestamp, kept as text so unparseable values still load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Metadata {
    pub fn new(version: impl Into<String>, schema_version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            schema_version: schema_version.into(),
            ..Default::default()
        }
    }

    /// Stamp both timestamps with the given instant
    pub fn with_timestamps(mut self, at: DateTime<Utc>) -> Self {
        let stamp = at.to_rfc3339();
        self.created_at = Some(stamp.clone());
        self.updated_at = Some(stamp);
        self
    }

    pub fn created_at_parsed(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref())
    }

    pub fn updated_at_parsed(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.updated_at.as_deref())
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// =============================================================================
// Agile principles
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgilePrinciples {
    pub manifesto: Manifesto,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifesto {
    /// Ordered value trade-offs
    pub values: Vec<ManifestoValue>,
    pub principles: Vec<Principle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestoValue {
    pub primary: String,
    pub secondary: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Principle {
    pub name: String,
    pub description: String,
    pub practical_application: String,
}

// =============================================================================
// Methodologies
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Methodologies {
    pub scrum: Methodology,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kanban: Option<Methodology>,
}

impl Methodologies {
    /// Named methodologies present in the document
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Methodology)> {
        std::iter::once(("scrum", &self.scrum))
            .chain(self.kanban.as_ref().map(|k| ("kanban", k)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Methodology {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub roles: Vec<Role>,
    pub events: Vec<Event>,
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub responsibilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub purpose: String,
    pub duration: String,
    pub participants: Vec<String>,
    pub outcomes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools_used: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub description: String,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creation_tools: Vec<String>,
}

// =============================================================================
// Workflow patterns
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPattern {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_to_use: Option<String>,
    pub steps: Vec<WorkflowStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Any JSON integer, including `1.0` and values beyond `i64`
    #[serde(deserialize_with = "deserialize_integer")]
    pub sequence: i128,
    pub action: String,
    /// Catalog tool invoked by this step
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, JsonValue>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decision_points: Vec<DecisionPoint>,
}

/// Accept every number draft-07 calls an integer: signed, unsigned or a float with no fraction
fn deserialize_integer<'de, D>(deserializer: D) -> std::result::Result<i128, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntegerVisitor;

    impl<'de> Visitor<'de> for IntegerVisitor {
        type Value = i128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<i128, E> {
            Ok(i128::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<i128, E> {
            Ok(i128::from(v))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<i128, E> {
            Ok(v)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<i128, E> {
            i128::try_from(v).map_err(|_| E::invalid_value(Unexpected::Other("integer out of range"), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<i128, E> {
            // i128::MAX is about 1.7e38
            if v.is_finite() && v.fract() == 0.0 && v.abs() < 1.0e38 {
                Ok(v as i128)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(IntegerVisitor)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionPoint {
    pub condition: String,
    pub action_if_true: String,
    pub action_if_false: String,
}

// =============================================================================
// Tool catalog
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCatalog {
    pub categories: Vec<ToolCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCategory {
    pub name: String,
    pub description: String,
    pub tools: Vec<ToolEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_cases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub best_practices: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_errors: Vec<CommonError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_tools: Vec<RelatedTool>,
}

impl ToolEntry {
    /// Names of parameters marked required
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonError {
    pub error: String,
    pub cause: String,
    pub solution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedTool {
    pub name: String,
    pub relationship: Relationship,
}

/// How a related tool connects to the tool that lists it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Prerequisite,
    FollowUp,
    Alternative,
    Complementary,
}

// =============================================================================
// Best practices
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestPractices {
    pub story_writing: Vec<StoryWritingPractice>,
    pub sprint_planning: Vec<SprintPlanningPractice>,
    pub estimation: Estimation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryWritingPractice {
    pub principle: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<StoryExamples>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryExamples {
    pub good: String,
    pub bad: String,
    pub why: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SprintPlanningPractice {
    pub practice: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Estimation {
    pub techniques: Vec<EstimationTechnique>,
    pub story_points_scale: Vec<StoryPointLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimationTechnique {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_to_use: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryPointLevel {
    pub value: f64,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub typical_tasks: Vec<String>,
}

// =============================================================================
// Decision trees
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root_question: String,
    /// Id of the first node; the first entry of `nodes` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_node: Option<String>,
    pub nodes: Vec<DecisionNode>,
}

impl DecisionTree {
    pub fn node(&self, id: &str) -> Option<&DecisionNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Node the walk starts from
    pub fn root(&self) -> Option<&DecisionNode> {
        match &self.root_node {
            Some(id) => self.node(id),
            None => self.nodes.first(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionNode {
    pub id: String,
    pub question: String,
    pub options: Vec<DecisionOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub condition: String,
    /// Id of the following node, or [`TERMINAL_NODE`]
    pub next_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

impl DecisionOption {
    pub fn is_terminal(&self) -> bool {
        self.next_node == TERMINAL_NODE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_skipped() {
        let option = DecisionOption {
            condition: "Yes".to_string(),
            next_node: TERMINAL_NODE.to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&option).unwrap();
        assert_eq!(value, json!({"condition": "Yes", "next_node": "END"}));
        assert!(option.is_terminal());
    }

    #[test]
    fn test_parameter_type_renamed() {
        let param = ToolParameter {
            name: "story_id".to_string(),
            param_type: "string".to_string(),
            required: true,
            description: "Story identifier".to_string(),
            examples: vec![],
        };
        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(value["type"], "string");
        assert!(value.get("param_type").is_none());
    }

    #[test]
    fn test_relationship_snake_case() {
        let related: RelatedTool =
            serde_json::from_value(json!({"name": "get_story", "relationship": "follow_up"})).unwrap();
        assert_eq!(related.relationship, Relationship::FollowUp);
    }

    #[test]
    fn test_root_node_defaults_to_first() {
        let tree = DecisionTree {
            name: "t".to_string(),
            root_question: "q".to_string(),
            nodes: vec![
                DecisionNode {
                    id: "a".to_string(),
                    question: "A?".to_string(),
                    options: vec![],
                },
                DecisionNode {
                    id: "b".to_string(),
                    question: "B?".to_string(),
                    options: vec![],
                },
            ],
            ..Default::default()
        };
        assert_eq!(tree.root().map(|n| n.id.as_str()), Some("a"));

        let tree = DecisionTree {
            root_node: Some("b".to_string()),
            ..tree
        };
        assert_eq!(tree.root().map(|n| n.id.as_str()), Some("b"));
    }

    #[test]
    fn test_timestamps_parse() {
        let meta = Metadata {
            created_at: Some("2025-01-15T09:00:00Z".to_string()),
            updated_at: Some("not a date".to_string()),
            ..Metadata::new("1.0", "1.0")
        };
        assert!(meta.created_at_parsed().is_some());
        assert!(meta.updated_at_parsed().is_none());
    }

    #[test]
    fn test_step_sequence_accepts_any_json_integer() {
        for (raw, expected) in [
            (json!(3), 3_i128),
            (json!(1.0), 1),
            (json!(10000000000000000000_u64), 10_000_000_000_000_000_000),
        ] {
            let step: WorkflowStep = serde_json::from_value(json!({
                "sequence": raw,
                "action": "Create the story",
                "tool": "create_story"
            }))
            .unwrap();
            assert_eq!(step.sequence, expected);
        }

        let err = serde_json::from_value::<WorkflowStep>(json!({
            "sequence": 1.5,
            "action": "Create the story",
            "tool": "create_story"
        }));
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_top_level_keys_preserved() {
        let mut doc = AgileDocumentation::default();
        doc.extra.insert("x-owner".to_string(), json!("platform team"));
        let value = doc.to_value().unwrap();
        assert_eq!(value["x-owner"], "platform team");
        let back = AgileDocumentation::from_value(&value).unwrap();
        assert_eq!(back.extra.get("x-owner"), Some(&json!("platform team")));
    }
}
