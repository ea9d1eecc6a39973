pub mod document;
pub mod schema;
pub mod semantic;

pub use document::DocumentValidator;
pub use schema::{bundled_schema, SchemaValidator, BUNDLED_SCHEMA, BUNDLED_SCHEMA_VERSION};
pub use semantic::SemanticChecker;
