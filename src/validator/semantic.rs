use super::schema::BUNDLED_SCHEMA_VERSION;
use crate::error::Result;
use crate::models::{
    AgileDocumentation, DecisionTree, SemanticFinding, Severity, ViolationCategory, WorkflowPattern,
};
use semver::Version;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};

/// Story point values accepted on the estimation scale
const FIBONACCI_SCALE: &[f64] = &[0.0, 0.5, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0];

/// Semantic checker for agile documentation (references, duplicates, ordering)
///
/// Runs on the typed model, so callers should only invoke it once the
/// document has passed structural validation.
#[derive(Debug, Clone)]
pub struct SemanticChecker {
    schema_version: String,
}

impl Default for SemanticChecker {
    fn default() -> Self {
        Self::new(BUNDLED_SCHEMA_VERSION)
    }
}

impl SemanticChecker {
    /// Create a checker that compares `metadata.schema_version` against `schema_version`
    pub fn new(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
        }
    }

    /// Deserialize a structurally valid document and check it
    pub fn check_value(&self, document: &JsonValue) -> Result<Vec<SemanticFinding>> {
        let doc = AgileDocumentation::from_value(document)?;
        Ok(self.check(&doc))
    }

    /// Run every semantic check over a document
    pub fn check(&self, doc: &AgileDocumentation) -> Vec<SemanticFinding> {
        let mut findings = Vec::new();

        for (index, tree) in doc.decision_trees.iter().enumerate() {
            findings.extend(self.check_decision_tree(index, tree));
        }

        findings.extend(self.check_duplicate_tools(doc));
        findings.extend(self.check_tool_references(doc));

        for (index, pattern) in doc.workflow_patterns.iter().enumerate() {
            findings.extend(self.check_step_sequence(index, pattern));
        }

        findings.extend(self.check_story_points(doc));
        findings.extend(self.check_timestamps(doc));
        findings.extend(self.check_schema_version(doc));

        tracing::debug!(findings = findings.len(), "semantic checks finished");
        findings
    }

    /// Check node ids, root node and `next_node` links of one tree
    fn check_decision_tree(&self, tree_index: usize, tree: &DecisionTree) -> Vec<SemanticFinding> {
        let mut findings = Vec::new();
        let base = format!("decision_trees[{}]", tree_index);
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (node_index, node) in tree.nodes.iter().enumerate() {
            if let Some(first) = seen.get(node.id.as_str()) {
                findings.push(SemanticFinding::new(
                    format!("{}.nodes[{}].id", base, node_index),
                    format!(
                        "Duplicate node id '{}' in tree '{}' (first declared at nodes[{}])",
                        node.id, tree.name, first
                    ),
                    Severity::High,
                    ViolationCategory::DuplicateId,
                ));
            } else {
                seen.insert(&node.id, node_index);
            }
        }

        if let Some(root) = &tree.root_node {
            if !seen.contains_key(root.as_str()) {
                findings.push(SemanticFinding::new(
                    format!("{}.root_node", base),
                    format!("Root node '{}' does not exist in tree '{}'", root, tree.name),
                    Severity::High,
                    ViolationCategory::BrokenReference,
                ));
            }
        }

        for (node_index, node) in tree.nodes.iter().enumerate() {
            for (option_index, option) in node.options.iter().enumerate() {
                if option.is_terminal() || seen.contains_key(option.next_node.as_str()) {
                    continue;
                }
                findings.push(SemanticFinding::new(
                    format!(
                        "{}.nodes[{}].options[{}].next_node",
                        base, node_index, option_index
                    ),
                    format!(
                        "Option '{}' points to unknown node '{}'",
                        option.condition, option.next_node
                    ),
                    Severity::High,
                    ViolationCategory::BrokenReference,
                ));
            }
        }

        findings
    }

    fn check_duplicate_tools(&self, doc: &AgileDocumentation) -> Vec<SemanticFinding> {
        let mut findings = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (category_index, category) in doc.tools.categories.iter().enumerate() {
            for (tool_index, tool) in category.tools.iter().enumerate() {
                if !seen.insert(tool.name.as_str()) {
                    findings.push(SemanticFinding::new(
                        format!(
                            "tools.categories[{}].tools[{}].name",
                            category_index, tool_index
                        ),
                        format!("Duplicate tool name '{}'", tool.name),
                        Severity::High,
                        ViolationCategory::DuplicateId,
                    ));
                }
            }
        }

        findings
    }

    /// Every tool named outside the catalog must exist in it
    fn check_tool_references(&self, doc: &AgileDocumentation) -> Vec<SemanticFinding> {
        let known: HashSet<&str> = doc.all_tools().map(|t| t.name.as_str()).collect();
        if known.is_empty() {
            return Vec::new();
        }

        let mut references: Vec<(String, &str)> = Vec::new();

        for (p, pattern) in doc.workflow_patterns.iter().enumerate() {
            for (s, step) in pattern.steps.iter().enumerate() {
                references.push((
                    format!("workflow_patterns[{}].steps[{}].tool", p, s),
                    step.tool.as_str(),
                ));
            }
        }

        for (t, tree) in doc.decision_trees.iter().enumerate() {
            for (n, node) in tree.nodes.iter().enumerate() {
                for (o, option) in node.options.iter().enumerate() {
                    for (i, tool) in option.tools.iter().enumerate() {
                        references.push((
                            format!(
                                "decision_trees[{}].nodes[{}].options[{}].tools[{}]",
                                t, n, o, i
                            ),
                            tool.as_str(),
                        ));
                    }
                }
            }
        }

        for (name, methodology) in doc.methodologies.iter() {
            for (e, event) in methodology.events.iter().enumerate() {
                for (i, tool) in event.tools_used.iter().enumerate() {
                    references.push((
                        format!("methodologies.{}.events[{}].tools_used[{}]", name, e, i),
                        tool.as_str(),
                    ));
                }
            }
            for (a, artifact) in methodology.artifacts.iter().enumerate() {
                for (i, tool) in artifact.creation_tools.iter().enumerate() {
                    references.push((
                        format!(
                            "methodologies.{}.artifacts[{}].creation_tools[{}]",
                            name, a, i
                        ),
                        tool.as_str(),
                    ));
                }
            }
        }

        for (c, category) in doc.tools.categories.iter().enumerate() {
            for (t, tool) in category.tools.iter().enumerate() {
                for (r, related) in tool.related_tools.iter().enumerate() {
                    references.push((
                        format!(
                            "tools.categories[{}].tools[{}].related_tools[{}].name",
                            c, t, r
                        ),
                        related.name.as_str(),
                    ));
                }
            }
        }

        references
            .into_iter()
            .filter(|(_, tool)| !known.contains(tool))
            .map(|(path, tool)| {
                SemanticFinding::new(
                    path,
                    format!("Tool '{}' is not in the tool catalog", tool),
                    Severity::Medium,
                    ViolationCategory::UnknownTool,
                )
            })
            .collect()
    }

    fn check_step_sequence(
        &self,
        pattern_index: usize,
        pattern: &WorkflowPattern,
    ) -> Vec<SemanticFinding> {
        let mut findings = Vec::new();

        let mut seen: HashSet<i128> = HashSet::new();
        let mut previous: Option<i128> = None;

        for (step_index, step) in pattern.steps.iter().enumerate() {
            let message = if !seen.insert(step.sequence) {
                Some(format!(
                    "Duplicate step sequence {} in workflow '{}'",
                    step.sequence, pattern.name
                ))
            } else {
                previous.filter(|prev| step.sequence < *prev).map(|prev| {
                    format!(
                        "Step sequence {} follows {} in workflow '{}'",
                        step.sequence, prev, pattern.name
                    )
                })
            };
            previous = Some(step.sequence);

            if let Some(message) = message {
                findings.push(SemanticFinding::new(
                    format!(
                        "workflow_patterns[{}].steps[{}].sequence",
                        pattern_index, step_index
                    ),
                    message,
                    Severity::Low,
                    ViolationCategory::Ordering,
                ));
            }
        }

        findings
    }

    fn check_story_points(&self, doc: &AgileDocumentation) -> Vec<SemanticFinding> {
        let mut findings = Vec::new();
        let scale = &doc.best_practices.estimation.story_points_scale;
        let mut previous: Option<f64> = None;

        for (index, level) in scale.iter().enumerate() {
            let path = format!(
                "best_practices.estimation.story_points_scale[{}].value",
                index
            );

            if !FIBONACCI_SCALE.contains(&level.value) {
                findings.push(SemanticFinding::new(
                    path.clone(),
                    format!("Story point value {} is not on the Fibonacci scale", level.value),
                    Severity::Low,
                    ViolationCategory::InvalidValue,
                ));
            }

            if let Some(prev) = previous {
                if level.value <= prev {
                    findings.push(SemanticFinding::new(
                        path,
                        format!(
                            "Story point value {} does not increase after {}",
                            level.value, prev
                        ),
                        Severity::Low,
                        ViolationCategory::Ordering,
                    ));
                }
            }
            previous = Some(level.value);
        }

        findings
    }

    fn check_timestamps(&self, doc: &AgileDocumentation) -> Vec<SemanticFinding> {
        match (
            doc.metadata.created_at_parsed(),
            doc.metadata.updated_at_parsed(),
        ) {
            (Some(created), Some(updated)) if updated < created => vec![SemanticFinding::new(
                "metadata.updated_at",
                format!(
                    "updated_at {} precedes created_at {}",
                    updated.to_rfc3339(),
                    created.to_rfc3339()
                ),
                Severity::Medium,
                ViolationCategory::InvalidValue,
            )],
            _ => Vec::new(),
        }
    }

    fn check_schema_version(&self, doc: &AgileDocumentation) -> Vec<SemanticFinding> {
        let declared = &doc.metadata.schema_version;
        let expected = parse_version(&self.schema_version);

        let message = match (parse_version(declared), expected) {
            (Some(found), Some(expected)) if found.major == expected.major => return Vec::new(),
            (Some(_), Some(_)) => format!(
                "schema_version {} is incompatible with supported version {}",
                declared, self.schema_version
            ),
            (None, _) => format!("schema_version '{}' is not a version number", declared),
            (Some(_), None) => return Vec::new(),
        };

        vec![SemanticFinding::new(
            "metadata.schema_version",
            message,
            Severity::Medium,
            ViolationCategory::VersionMismatch,
        )]
    }
}

/// Parse `1`, `1.0` or `1.0.0` style versions
fn parse_version(text: &str) -> Option<Version> {
    let trimmed = text.trim().trim_start_matches('v');
    let parts = trimmed.split('.').count();
    let padded = match parts {
        1 => format!("{}.0.0", trimmed),
        2 => format!("{}.0", trimmed),
        _ => trimmed.to_string(),
    };
    Version::parse(&padded).ok()
}
