//! Document Parser
//!
//! Turns JSON or YAML text into a `serde_json::Value` ready for schema
//! validation, with:
//! - BOM (Byte Order Mark) stripping
//! - Line ending normalization (CRLF → LF)
//! - Format detection from file extension or leading character

use crate::error::{DocsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::Path;

/// Text encodings accepted for documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }

    /// Guess format from content: a leading `{` or `[` means JSON
    pub fn sniff(content: &str) -> Self {
        match normalize_content(content).trim_start().chars().next() {
            Some('{') | Some('[') => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
        }
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            other => Err(DocsError::InvalidQuery(format!(
                "unknown format '{}' (expected json or yaml)",
                other
            ))),
        }
    }
}

/// Normalize content for parsing
///
/// - Strips UTF-8 BOM
/// - Converts CRLF/CR to LF
pub fn normalize_content(content: &str) -> String {
    let s = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parse document text in the given format
///
/// # Arguments
/// * `content` - Raw text (may contain BOM, CRLF)
/// * `format` - JSON or YAML
/// * `source_name` - Label used in parse errors
pub fn parse_document(content: &str, format: DocumentFormat, source_name: &str) -> Result<JsonValue> {
    let normalized = normalize_content(content);

    match format {
        DocumentFormat::Json => {
            serde_json::from_str(&normalized).map_err(|e| DocsError::parse(source_name, e))
        }
        DocumentFormat::Yaml => {
            let yaml_value: serde_yaml::Value =
                serde_yaml::from_str(&normalized).map_err(|e| DocsError::parse(source_name, e))?;

            // Convert YAML to JSON for schema validation
            serde_json::to_value(&yaml_value).map_err(|e| {
                DocsError::parse(source_name, format!("cannot represent YAML as JSON: {}", e))
            })
        }
    }
}

/// Parse text whose format is unknown, sniffing it first
pub fn parse_document_auto(content: &str, source_name: &str) -> Result<JsonValue> {
    parse_document(content, DocumentFormat::sniff(content), source_name)
}

/// Read and parse a document file, detecting format from its extension
///
/// Bytes that are not UTF-8 are a parse error; only real I/O failures are `Io`.
pub fn parse_file(path: &Path) -> Result<JsonValue> {
    let bytes = std::fs::read(path)?;
    let source_name = path.display().to_string();
    let content = String::from_utf8(bytes).map_err(|e| DocsError::parse(&source_name, e))?;
    match DocumentFormat::from_path(path) {
        Some(format) => parse_document(&content, format, &source_name),
        None => parse_document_auto(&content, &source_name),
    }
}
