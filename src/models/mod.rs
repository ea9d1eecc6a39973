pub mod documentation;
pub mod location;
pub mod validation;

pub use documentation::{
    AgileDocumentation, AgilePrinciples, Artifact, BestPractices, CommonError, DecisionNode,
    DecisionOption, DecisionPoint, DecisionTree, Estimation, EstimationTechnique, Event, Manifesto,
    ManifestoValue, Metadata, Methodologies, Methodology, Principle, RelatedTool, Relationship,
    Role, SprintPlanningPractice, StoryExamples, StoryPointLevel, StoryWritingPractice,
    ToolCatalog, ToolCategory, ToolEntry, ToolParameter, WorkflowPattern, WorkflowStep,
    TERMINAL_NODE,
};
pub use validation::{SemanticFinding, Severity, ValidationReport, Violation, ViolationCategory};
