//! Fixed system instruction, tool set, and request assembly.

use eteon_core::{
    Content, GenerateRequest, GenerationConfig, ThinkingConfig, ThinkingLevel, Tool,
};

const SYSTEM_PROMPT: &[&str] = &[
    "You are Eteon, a concise assistant powered by Gemini 2.5 Pro.",
    "Always provide focused, high-signal answers and respect the user's language.",
    "When information may be outdated or needs verification, use the available web grounding search before responding.",
    "Run calculations and data transformations through the code execution tool whenever computation is involved, and use its results in the final answer.",
    "Load any user-provided URLs via the URL context tool to ground your responses in those sources.",
    "Handle multimodal inputs such as images, audio, and video without asking the user to reformat them.",
    "Produce replies that comply with Telegram MarkdownV2 formatting rules.",
];

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn system_instruction() -> Content {
        Content::text(SYSTEM_PROMPT.join(" "))
    }

    /// Web search, URL context, and code execution.
    pub fn tools() -> Vec<Tool> {
        vec![Tool::GoogleSearch {}, Tool::UrlContext {}, Tool::CodeExecution {}]
    }

    /// Assemble a request for `contents` under the session's thinking level.
    pub fn build_request(
        model: &str,
        contents: Vec<Content>,
        thinking: ThinkingLevel,
        system_instruction: &Content,
        tools: &[Tool],
    ) -> GenerateRequest {
        GenerateRequest {
            model: model.to_string(),
            contents,
            system_instruction: Some(system_instruction.clone()),
            tools: tools.to_vec(),
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig::with_thoughts(thinking.budget())),
            }),
        }
    }
}
