//! Per-response metadata the user can inspect after the reply is delivered.

use serde::{Deserialize, Serialize};

/// A cited web source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub uri: String,
}

/// One executed-code step and what it produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub language: String,
    pub code: String,
    pub outcome: String,
    pub output: String,
}

/// Reasoning, citations, and code transcript produced alongside one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseArtifacts {
    pub thoughts: Vec<String>,
    pub sources: Vec<SourceRef>,
    pub code_snippets: Vec<CodeSnippet>,
}
