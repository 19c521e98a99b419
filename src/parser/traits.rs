//! Parser trait definition

use crate::parser::types::LockedVersions;

/// Trait for parsing lockfiles into exact installed versions
pub trait LockfileParser: Send + Sync {
    /// File name this parser reads, relative to the project root
    fn file_name(&self) -> &'static str;

    /// Parse the content and extract pinned versions keyed by package name
    fn parse(&self, content: &str) -> Result<LockedVersions, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Content is not valid JSON or does not have the expected shape
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Invalid syntax in the file
    #[error("Invalid syntax at line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },
}
