//! Code Transcript Rendering
//!
//! Renders executed-code steps as MarkdownV2 fenced blocks.

use eteon_core::CodeSnippet;

use crate::escape::escape_code;

/// Fence language used when the snippet does not name one.
const DEFAULT_LANGUAGE: &str = "text";

pub struct CodeBlockFormatter;

impl CodeBlockFormatter {
    /// Render one snippet under a `Code snippet N:` header. `index` is 1-based.
    pub fn format_snippet(index: usize, snippet: &CodeSnippet) -> String {
        let language = snippet.language.trim().to_lowercase();
        let language = if language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            language.as_str()
        };

        let mut out = format!("Code snippet {index}:\n");
        out.push_str(&Self::fenced(language, &snippet.code));
        if !snippet.outcome.is_empty() {
            out.push_str("\nOutcome: ");
            out.push_str(&snippet.outcome);
        }
        if !snippet.output.trim().is_empty() {
            out.push_str("\nOutput:\n");
            out.push_str(&Self::fenced(language, &snippet.output));
        }
        out
    }

    /// Render every snippet, separated by blank lines.
    pub fn format_all(snippets: &[CodeSnippet]) -> String {
        snippets
            .iter()
            .enumerate()
            .map(|(i, snippet)| Self::format_snippet(i + 1, snippet))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn fenced(language: &str, body: &str) -> String {
        format!("```{language}\n{}\n```", escape_code(body))
    }
}
