//! Documentation service - read-only access to the bundled agile documentation
//!
//! Serves the documentation that agents consult before driving the agile
//! tool set: whole or per topic, full or summarized, as JSON or YAML.

use crate::error::{DocsError, Result};
use crate::models::{AgileDocumentation, DecisionTree, ToolEntry, WorkflowPattern};
use crate::parser::DocumentFormat;
use crate::validator::SchemaValidator;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use std::str::FromStr;

/// Documentation shipped with the crate
pub const BUNDLED_DOCUMENTATION: &str = include_str!("../../data/agile_documentation.json");

/// Section of the documentation to return
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    #[default]
    All,
    Principles,
    Methodologies,
    Workflows,
    Tools,
    BestPractices,
    DecisionTrees,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::All,
        Topic::Principles,
        Topic::Methodologies,
        Topic::Workflows,
        Topic::Tools,
        Topic::BestPractices,
        Topic::DecisionTrees,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Topic::All => "all",
            Topic::Principles => "principles",
            Topic::Methodologies => "methodologies",
            Topic::Workflows => "workflows",
            Topic::Tools => "tools",
            Topic::BestPractices => "best_practices",
            Topic::DecisionTrees => "decision_trees",
        }
    }

    /// Top-level document keys included for this topic, besides `metadata`
    pub fn sections(&self) -> &'static [&'static str] {
        match self {
            Topic::All => &[
                "agile_principles",
                "methodologies",
                "workflow_patterns",
                "tools",
                "best_practices",
                "decision_trees",
            ],
            Topic::Principles => &["agile_principles"],
            Topic::Methodologies => &["methodologies"],
            Topic::Workflows => &["workflow_patterns"],
            Topic::Tools => &["tools"],
            Topic::BestPractices => &["best_practices"],
            Topic::DecisionTrees => &["decision_trees"],
        }
    }
}

impl FromStr for Topic {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self> {
        Topic::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = Topic::ALL.iter().map(|t| t.name()).collect();
                DocsError::InvalidQuery(format!(
                    "unknown topic '{}' (expected one of: {})",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Amount of content returned per section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    #[default]
    Full,
    Summary,
}

impl FromStr for DetailLevel {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" => Ok(DetailLevel::Full),
            "summary" => Ok(DetailLevel::Summary),
            other => Err(DocsError::InvalidQuery(format!(
                "unknown detail level '{}' (expected full or summary)",
                other
            ))),
        }
    }
}

/// A documentation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationQuery {
    pub topic: Topic,
    pub detail: DetailLevel,
    pub format: DocumentFormat,
}

impl Default for DocumentationQuery {
    fn default() -> Self {
        Self {
            topic: Topic::All,
            detail: DetailLevel::Full,
            format: DocumentFormat::Json,
        }
    }
}

impl DocumentationQuery {
    /// Build a query from loosely typed input, rejecting unknown values
    pub fn parse(topic: Option<&str>, detail: Option<&str>, format: Option<&str>) -> Result<Self> {
        Ok(Self {
            topic: topic.map(str::parse::<Topic>).transpose()?.unwrap_or_default(),
            detail: detail.map(str::parse::<DetailLevel>).transpose()?.unwrap_or_default(),
            format: format
                .map(str::parse::<DocumentFormat>)
                .transpose()?
                .unwrap_or(DocumentFormat::Json),
        })
    }
}

/// Where a decision-tree walk ended
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionOutcome {
    pub tree: String,
    /// Node ids visited, root first
    pub visited: Vec<String>,
    pub action: Option<String>,
    pub tools: Vec<String>,
}

/// Validated agile documentation plus query helpers
#[derive(Debug, Clone)]
pub struct DocumentationService {
    document: AgileDocumentation,
    raw: JsonValue,
}

impl DocumentationService {
    /// Load the bundled documentation, validating it against the bundled schema
    ///
    /// Failure here is a packaging defect and is reported as a schema load error.
    pub fn bundled() -> Result<Self> {
        let raw: JsonValue = serde_json::from_str(BUNDLED_DOCUMENTATION).map_err(|e| {
            DocsError::SchemaLoad(format!("bundled documentation is not valid JSON: {}", e))
        })?;
        let validator = SchemaValidator::bundled()?;

        Self::from_value(raw, &validator).map_err(|e| match e {
            DocsError::Conformance(violations) => DocsError::SchemaLoad(format!(
                "bundled documentation does not conform to the schema: {}",
                violations
                    .iter()
                    .map(|v| format!("{} ({})", v.path, v.message))
                    .collect::<Vec<_>>()
                    .join("; ")
            )),
            other => other,
        })
    }

    /// Wrap a document after validating it with the given validator
    pub fn from_value(raw: JsonValue, validator: &SchemaValidator) -> Result<Self> {
        validator
            .validate_value(&raw, "documentation")
            .ensure_valid()?;
        let document = AgileDocumentation::from_value(&raw)?;
        tracing::debug!(
            version = %document.metadata.version,
            tools = document.all_tools().count(),
            "loaded agile documentation"
        );
        Ok(Self { document, raw })
    }

    pub fn document(&self) -> &AgileDocumentation {
        &self.document
    }

    /// Answer a query as a JSON value; `metadata` is always included
    pub fn query_value(&self, topic: Topic, detail: DetailLevel) -> JsonValue {
        let mut result = Map::new();
        result.insert(
            "metadata".to_string(),
            self.raw.get("metadata").cloned().unwrap_or(JsonValue::Null),
        );

        for section in topic.sections() {
            let value = match detail {
                DetailLevel::Full => self.raw.get(*section).cloned().unwrap_or(JsonValue::Null),
                DetailLevel::Summary => self.summarize(section),
            };
            result.insert(section.to_string(), value);
        }

        JsonValue::Object(result)
    }

    /// Answer a query as rendered text
    pub fn query(&self, query: &DocumentationQuery) -> Result<String> {
        let value = self.query_value(query.topic, query.detail);
        render(&value, query.format)
    }

    fn summarize(&self, section: &str) -> JsonValue {
        let doc = &self.document;
        match section {
            "agile_principles" => {
                let manifesto = &doc.agile_principles.manifesto;
                json!({
                    "manifesto": {
                        "values_count": manifesto.values.len(),
                        "principles_count": manifesto.principles.len(),
                        "values": manifesto
                            .values
                            .iter()
                            .map(|v| format!("{} over {}", v.primary, v.secondary))
                            .collect::<Vec<_>>(),
                    }
                })
            }
            "methodologies" => {
                let summary: Map<String, JsonValue> = doc
                    .methodologies
                    .iter()
                    .map(|(name, m)| {
                        (
                            name.to_string(),
                            json!({
                                "roles_count": m.roles.len(),
                                "events_count": m.events.len(),
                                "artifacts_count": m.artifacts.len(),
                                "roles": m.roles.iter().map(|r| &r.name).collect::<Vec<_>>(),
                                "events": m.events.iter().map(|e| &e.name).collect::<Vec<_>>(),
                                "artifacts": m.artifacts.iter().map(|a| &a.name).collect::<Vec<_>>(),
                            }),
                        )
                    })
                    .collect();
                JsonValue::Object(summary)
            }
            "workflow_patterns" => json!({
                "patterns_count": doc.workflow_patterns.len(),
                "patterns": doc
                    .workflow_patterns
                    .iter()
                    .map(|w| json!({"name": w.name, "steps_count": w.steps.len()}))
                    .collect::<Vec<_>>(),
            }),
            "tools" => json!({
                "categories_count": doc.tools.categories.len(),
                "tools_count": doc.all_tools().count(),
                "categories": doc
                    .tools
                    .categories
                    .iter()
                    .map(|c| json!({
                        "name": c.name,
                        "tools": c.tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                    }))
                    .collect::<Vec<_>>(),
            }),
            "best_practices" => {
                let practices = &doc.best_practices;
                json!({
                    "story_writing_count": practices.story_writing.len(),
                    "sprint_planning_count": practices.sprint_planning.len(),
                    "estimation_techniques": practices
                        .estimation
                        .techniques
                        .iter()
                        .map(|t| &t.name)
                        .collect::<Vec<_>>(),
                    "story_points_scale": practices
                        .estimation
                        .story_points_scale
                        .iter()
                        .map(|l| l.value)
                        .collect::<Vec<_>>(),
                })
            }
            "decision_trees" => json!({
                "trees_count": doc.decision_trees.len(),
                "trees": doc
                    .decision_trees
                    .iter()
                    .map(|t| json!({"name": t.name, "nodes_count": t.nodes.len()}))
                    .collect::<Vec<_>>(),
            }),
            _ => JsonValue::Null,
        }
    }

    pub fn find_tool(&self, name: &str) -> Option<&ToolEntry> {
        self.document.find_tool(name)
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.document.tool_names()
    }

    pub fn find_workflow(&self, name: &str) -> Option<&WorkflowPattern> {
        self.document.find_workflow(name)
    }

    pub fn find_decision_tree(&self, name: &str) -> Option<&DecisionTree> {
        self.document.find_decision_tree(name)
    }

    /// Follow a decision tree from its root using the chosen option conditions
    ///
    /// Conditions match case-insensitively. The walk must end on an `END`
    /// option exactly at the last choice; running out of choices first, or
    /// passing choices after `END`, is an error.
    pub fn walk_decision_tree(&self, tree_name: &str, choices: &[&str]) -> Result<DecisionOutcome> {
        let tree = self.find_decision_tree(tree_name).ok_or_else(|| {
            DocsError::DecisionTree(format!("no decision tree named '{}'", tree_name))
        })?;

        let mut node = tree.root().ok_or_else(|| {
            DocsError::DecisionTree(format!("tree '{}' has no root node", tree.name))
        })?;
        let mut visited = vec![node.id.clone()];

        for (index, choice) in choices.iter().enumerate() {
            let option = node
                .options
                .iter()
                .find(|o| o.condition.eq_ignore_ascii_case(choice.trim()))
                .ok_or_else(|| {
                    let known: Vec<&str> = node.options.iter().map(|o| o.condition.as_str()).collect();
                    DocsError::DecisionTree(format!(
                        "node '{}' has no option '{}' (options: {})",
                        node.id,
                        choice,
                        known.join(", ")
                    ))
                })?;

            if option.is_terminal() {
                let unused = &choices[index + 1..];
                if !unused.is_empty() {
                    return Err(DocsError::DecisionTree(format!(
                        "walk of '{}' reached END at node '{}' with unused choices: {}",
                        tree.name,
                        node.id,
                        unused.join(", ")
                    )));
                }
                return Ok(DecisionOutcome {
                    tree: tree.name.clone(),
                    visited,
                    action: option.action.clone(),
                    tools: option.tools.clone(),
                });
            }

            node = tree.node(&option.next_node).ok_or_else(|| {
                DocsError::DecisionTree(format!(
                    "option '{}' of node '{}' points to unknown node '{}'",
                    option.condition, node.id, option.next_node
                ))
            })?;
            visited.push(node.id.clone());
        }

        Err(DocsError::DecisionTree(format!(
            "walk of '{}' stopped at node '{}' before reaching END: {}",
            tree.name, node.id, node.question
        )))
    }
}

/// Render a value as pretty JSON or YAML
pub fn render(value: &JsonValue, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        DocumentFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}
