//! Completion request and response schema.

use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::thinking::ThinkingBudget;

/// Prompt-feedback value the service uses when nothing was blocked.
const BLOCK_REASON_UNSPECIFIED: &str = "BLOCK_REASON_UNSPECIFIED";

/// A single generate-content call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Model identifier; travels in the request path, not the body.
    #[serde(skip)]
    pub model: String,
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Server-side tools the model may invoke while answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    GoogleSearch {},
    UrlContext {},
    CodeExecution {},
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: i32,
    pub include_thoughts: bool,
}

impl ThinkingConfig {
    /// Thinking directive that also asks for reasoning traces in the reply.
    pub fn with_thoughts(budget: ThinkingBudget) -> Self {
        Self {
            thinking_budget: budget.wire_value(),
            include_thoughts: true,
        }
    }
}

/// Response to a [`GenerateRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateResponse {
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Reason the prompt was blocked by safety filters, if it was.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
            .filter(|reason| !reason.is_empty() && *reason != BLOCK_REASON_UNSPECIFIED)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_metadata: Option<CitationMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    #[serde(default, alias = "citations")]
    pub citation_sources: Vec<Citation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebChunk {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Part;
    use crate::thinking::ThinkingLevel;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            model: "gemini-2.5-pro".into(),
            contents: vec![Content::user(vec![Part::text("hi")])],
            system_instruction: Some(Content::text("be brief")),
            tools: vec![Tool::GoogleSearch {}, Tool::UrlContext {}, Tool::CodeExecution {}],
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig::with_thoughts(
                    ThinkingLevel::Dynamic.budget(),
                )),
            }),
        };

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("model").is_none());
        assert_eq!(
            body["tools"],
            json!([{"googleSearch": {}}, {"urlContext": {}}, {"codeExecution": {}}])
        );
        assert_eq!(
            body["generationConfig"]["thinkingConfig"],
            json!({"thinkingBudget": -1, "includeThoughts": true})
        );
        assert_eq!(body["systemInstruction"], json!({"parts": [{"text": "be brief"}]}));
        assert_eq!(body["contents"][0]["role"], "user");
    }

    #[test]
    fn test_block_reason_ignores_unspecified() {
        let mut response = GenerateResponse {
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some("BLOCK_REASON_UNSPECIFIED".into()),
            }),
            ..GenerateResponse::default()
        };
        assert_eq!(response.block_reason(), None);

        response.prompt_feedback = Some(PromptFeedback {
            block_reason: Some("SAFETY".into()),
        });
        assert_eq!(response.block_reason(), Some("SAFETY"));
    }

    #[test]
    fn test_response_with_grounding_deserializes() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Paris"}]},
                "finishReason": "STOP",
                "citationMetadata": {"citationSources": [{"uri": "https://a.example", "title": "A"}]},
                "groundingMetadata": {"groundingChunks": [{"web": {"uri": "https://b.example", "title": "B"}}]}
            }]
        });
        let response: GenerateResponse = serde_json::from_value(raw).unwrap();
        let candidate = response.first_candidate().unwrap();
        assert_eq!(
            candidate.citation_metadata.as_ref().unwrap().citation_sources[0].uri.as_deref(),
            Some("https://a.example")
        );
        assert_eq!(
            candidate.grounding_metadata.as_ref().unwrap().grounding_chunks[0]
                .web
                .as_ref()
                .unwrap()
                .title
                .as_deref(),
            Some("B")
        );
        assert!(response.block_reason().is_none());
    }
}
