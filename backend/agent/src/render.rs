//! Turning completion responses into reply text, artifacts, and keyboards.

use std::collections::HashSet;

use eteon_core::{
    CallbackAction, Candidate, CodeSnippet, Content, GenerateResponse, InlineButton,
    InlineKeyboard, ResponseArtifacts, SourceRef, ThinkingLevel,
};
use eteon_markdown::summarize_thoughts;

/// Maximum number of summarized reasoning steps shown to the user.
pub const THOUGHT_SUMMARY_LIMIT: usize = 5;

/// Reply text plus the metadata shown on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedReply {
    pub text: String,
    pub artifacts: ResponseArtifacts,
}

/// Split the first candidate into reply text, reasoning, sources, and code steps.
pub fn render_response(response: &GenerateResponse) -> RenderedReply {
    let Some(candidate) = response.first_candidate() else {
        return RenderedReply::default();
    };
    let Some(content) = candidate.content.as_ref() else {
        return RenderedReply::default();
    };

    let mut segments: Vec<String> = Vec::new();
    let mut thoughts: Vec<String> = Vec::new();
    let mut snippets: Vec<CodeSnippet> = Vec::new();
    // Index of the latest snippet still waiting for its execution result.
    let mut pending: Option<usize> = None;

    for part in &content.parts {
        if part.thought {
            if let Some(text) = part.trimmed_text() {
                thoughts.push(text.to_string());
            }
            continue;
        }

        if let Some(text) = part.trimmed_text() {
            segments.push(text.to_string());
        }

        if let Some(code) = &part.executable_code {
            snippets.push(CodeSnippet {
                language: code.language.clone(),
                code: code.code.clone(),
                ..CodeSnippet::default()
            });
            pending = Some(snippets.len() - 1);
        }

        if let Some(result) = &part.code_execution_result {
            let output = result.output.trim();
            if !output.is_empty() {
                segments.push(format!("Result:\n{output}"));
            }

            // Results usually arrive in the part after their code.
            let index = pending.take().unwrap_or_else(|| {
                snippets.push(CodeSnippet::default());
                snippets.len() - 1
            });
            snippets[index].outcome = result.outcome.clone();
            snippets[index].output = result.output.clone();
        }
    }

    RenderedReply {
        text: segments.join("\n\n").trim().to_string(),
        artifacts: ResponseArtifacts {
            thoughts,
            sources: collect_sources(candidate),
            code_snippets: snippets,
        },
    }
}

/// Citations first, then grounding web chunks; deduplicated by URI, first title wins.
pub fn collect_sources(candidate: &Candidate) -> Vec<SourceRef> {
    let citations = candidate
        .citation_metadata
        .iter()
        .flat_map(|meta| &meta.citation_sources)
        .map(|c| (c.title.as_deref(), c.uri.as_deref()));
    let chunks = candidate
        .grounding_metadata
        .iter()
        .flat_map(|meta| &meta.grounding_chunks)
        .filter_map(|chunk| chunk.web.as_ref())
        .map(|web| (web.title.as_deref(), web.uri.as_deref()));

    dedupe_sources(citations.chain(chunks))
}

fn dedupe_sources<'a>(
    entries: impl Iterator<Item = (Option<&'a str>, Option<&'a str>)>,
) -> Vec<SourceRef> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for (title, uri) in entries {
        let uri = uri.unwrap_or_default().trim();
        if uri.is_empty() || !seen.insert(uri.to_string()) {
            continue;
        }
        sources.push(SourceRef {
            title: title.unwrap_or_default().trim().to_string(),
            uri: uri.to_string(),
        });
    }
    sources
}

/// The model turn as it should be remembered: reasoning parts removed. `None` when
/// nothing else is left.
pub fn strip_thoughts(content: &Content) -> Option<Content> {
    let parts: Vec<_> = content.parts.iter().filter(|p| !p.thought).cloned().collect();
    if parts.is_empty() {
        return None;
    }
    Some(Content::model(parts))
}

/// Buttons under a reply, each carrying the artifact key.
pub fn response_keyboard(key: &str, artifacts: &ResponseArtifacts) -> InlineKeyboard {
    let mut keyboard = InlineKeyboard::new();
    keyboard.push_row(InlineButton::new(
        "Show thoughts",
        CallbackAction::ShowThoughts(key.to_string()),
    ));
    if !artifacts.sources.is_empty() {
        keyboard.push_row(InlineButton::new(
            "Show sources",
            CallbackAction::ShowSources(key.to_string()),
        ));
    }
    if !artifacts.code_snippets.is_empty() {
        keyboard.push_row(InlineButton::new(
            "Show code",
            CallbackAction::ShowCode(key.to_string()),
        ));
    }
    keyboard
}

/// One button per thinking level.
pub fn settings_keyboard() -> InlineKeyboard {
    let mut keyboard = InlineKeyboard::new();
    for level in ThinkingLevel::ALL {
        keyboard.push_row(InlineButton::new(
            level.label(),
            CallbackAction::SetThinking(level),
        ));
    }
    keyboard
}

/// Bulleted reasoning summary, or `None` when there is nothing to summarize.
pub fn thoughts_summary(thoughts: &[String]) -> Option<String> {
    let steps = summarize_thoughts(thoughts, THOUGHT_SUMMARY_LIMIT);
    if steps.is_empty() {
        return None;
    }
    let mut body = String::from("Reasoning summary:");
    for step in steps {
        body.push_str("\n- ");
        body.push_str(&step);
    }
    Some(body)
}

/// Numbered `title - uri` list.
pub fn sources_list(sources: &[SourceRef]) -> String {
    let mut body = String::from("Sources:");
    for (i, source) in sources.iter().enumerate() {
        let title = if source.title.is_empty() {
            "Untitled"
        } else {
            source.title.as_str()
        };
        body.push_str(&format!("\n{}. {} - {}", i + 1, title, source.uri));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use eteon_core::{
        Citation, CitationMetadata, CodeExecutionResult, ExecutableCode, GroundingChunk,
        GroundingMetadata, Part, WebChunk,
    };

    fn response(parts: Vec<Part>) -> GenerateResponse {
        GenerateResponse {
            candidates: vec![Candidate {
                content: Some(Content::model(parts)),
                ..Candidate::default()
            }],
            prompt_feedback: None,
        }
    }

    fn code_part(code: &str) -> Part {
        Part {
            executable_code: Some(ExecutableCode {
                language: "PYTHON".into(),
                code: code.into(),
            }),
            ..Part::default()
        }
    }

    fn result_part(output: &str) -> Part {
        Part {
            code_execution_result: Some(CodeExecutionResult {
                outcome: "OUTCOME_OK".into(),
                output: output.into(),
            }),
            ..Part::default()
        }
    }

    #[test]
    fn test_separates_thoughts_text_and_code() {
        let rendered = render_response(&response(vec![
            Part::thought("Let me compute. Then answer."),
            Part::text("Here you go."),
            code_part("print(6*7)"),
            result_part("42\n"),
            Part::text("  The answer is 42.  "),
        ]));

        assert_eq!(rendered.text, "Here you go.\n\nResult:\n42\n\nThe answer is 42.");
        assert_eq!(rendered.artifacts.thoughts, vec!["Let me compute. Then answer."]);
        assert_eq!(rendered.artifacts.code_snippets.len(), 1);
        let snippet = &rendered.artifacts.code_snippets[0];
        assert_eq!(snippet.code, "print(6*7)");
        assert_eq!(snippet.outcome, "OUTCOME_OK");
        assert_eq!(snippet.output, "42\n");
    }

    #[test]
    fn test_result_in_same_part_as_code() {
        let mut part = code_part("print(2+2)");
        part.code_execution_result = result_part("4\n").code_execution_result;
        let rendered = render_response(&response(vec![Part::text("4"), part]));

        assert_eq!(rendered.text, "4\n\nResult:\n4");
        assert_eq!(rendered.artifacts.code_snippets.len(), 1);
        assert_eq!(rendered.artifacts.code_snippets[0].output, "4\n");
    }

    #[test]
    fn test_orphan_result_opens_snippet() {
        let rendered = render_response(&response(vec![result_part("done")]));
        assert_eq!(rendered.artifacts.code_snippets.len(), 1);
        assert!(rendered.artifacts.code_snippets[0].code.is_empty());
        assert_eq!(rendered.text, "Result:\ndone");
    }

    #[test]
    fn test_empty_result_still_closes_its_snippet() {
        let mut silent = result_part("");
        if let Some(result) = silent.code_execution_result.as_mut() {
            result.outcome.clear();
        }
        let rendered = render_response(&response(vec![
            code_part("x = 1"),
            silent,
            result_part("late"),
        ]));

        let snippets = &rendered.artifacts.code_snippets;
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].code, "x = 1");
        assert!(snippets[0].output.is_empty());
        assert!(snippets[1].code.is_empty());
        assert_eq!(snippets[1].output, "late");
    }

    #[test]
    fn test_empty_response_renders_nothing() {
        let rendered = render_response(&GenerateResponse::default());
        assert_eq!(rendered, RenderedReply::default());
    }

    #[test]
    fn test_sources_deduplicated_first_wins() {
        let candidate = Candidate {
            citation_metadata: Some(CitationMetadata {
                citation_sources: vec![
                    Citation {
                        title: Some("A".into()),
                        uri: Some("u1".into()),
                    },
                    Citation {
                        title: Some("B".into()),
                        uri: Some("u2".into()),
                    },
                ],
            }),
            grounding_metadata: Some(GroundingMetadata {
                grounding_chunks: vec![
                    GroundingChunk {
                        web: Some(WebChunk {
                            title: Some("C".into()),
                            uri: Some(" u1 ".into()),
                        }),
                    },
                    GroundingChunk { web: None },
                    GroundingChunk {
                        web: Some(WebChunk {
                            title: None,
                            uri: Some("".into()),
                        }),
                    },
                ],
            }),
            ..Candidate::default()
        };

        let sources = collect_sources(&candidate);
        assert_eq!(
            sources,
            vec![
                SourceRef {
                    title: "A".into(),
                    uri: "u1".into()
                },
                SourceRef {
                    title: "B".into(),
                    uri: "u2".into()
                },
            ]
        );
    }

    #[test]
    fn test_strip_thoughts() {
        let content = Content::model(vec![Part::thought("hmm"), Part::text("answer")]);
        let stripped = strip_thoughts(&content).unwrap();
        assert_eq!(stripped.parts, vec![Part::text("answer")]);

        let only_thoughts = Content::model(vec![Part::thought("hmm")]);
        assert!(strip_thoughts(&only_thoughts).is_none());
    }

    #[test]
    fn test_response_keyboard_buttons() {
        let artifacts = ResponseArtifacts {
            code_snippets: vec![CodeSnippet::default()],
            ..ResponseArtifacts::default()
        };
        let keyboard = response_keyboard("3", &artifacts);
        let labels: Vec<_> = keyboard.buttons().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Show thoughts", "Show code"]);
        assert!(keyboard
            .buttons()
            .all(|b| b.action.encode().ends_with(":3")));
    }

    #[test]
    fn test_settings_keyboard_has_every_level() {
        let keyboard = settings_keyboard();
        assert_eq!(keyboard.rows.len(), 4);
        assert_eq!(keyboard.rows[3][0].label, "Dynamic reasoning");
    }

    #[test]
    fn test_summary_and_source_bodies() {
        assert_eq!(thoughts_summary(&[]), None);
        assert_eq!(
            thoughts_summary(&["Check units. Multiply!".to_string()]).unwrap(),
            "Reasoning summary:\n- Check units\n- Multiply"
        );
        let body = sources_list(&[
            SourceRef {
                title: String::new(),
                uri: "https://x.example".into(),
            },
            SourceRef {
                title: "Docs".into(),
                uri: "https://docs.example".into(),
            },
        ]);
        assert_eq!(
            body,
            "Sources:\n1. Untitled - https://x.example\n2. Docs - https://docs.example"
        );
    }
}
