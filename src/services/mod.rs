//! Service layer for agile-docs
//!
//! Business logic shared by the library API and the CLI commands.

pub mod documentation_service;

pub use documentation_service::{
    render, DecisionOutcome, DetailLevel, DocumentationQuery, DocumentationService, Topic,
    BUNDLED_DOCUMENTATION,
};
