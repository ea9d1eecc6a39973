pub mod document;

pub use document::{
    normalize_content, parse_document, parse_document_auto, parse_file, DocumentFormat,
};
