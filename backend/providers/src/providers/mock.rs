use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use eteon_core::{CompletionClient, Content, GenerateRequest, GenerateResponse, Part};

/// A mock completion provider that replays scripted responses and records requests.
pub struct MockProvider {
    name: String,
    script: Mutex<VecDeque<Result<GenerateResponse, String>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for the next call.
    pub fn with_response(mut self, response: GenerateResponse) -> Self {
        self.script.get_mut().push_back(Ok(response));
        self
    }

    /// Queue a failure for the next call.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.script.get_mut().push_back(Err(message.into()));
        self
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().await.clone()
    }

    /// A response whose first candidate holds a single model turn.
    pub fn reply(parts: Vec<Part>) -> GenerateResponse {
        GenerateResponse {
            candidates: vec![eteon_core::Candidate {
                content: Some(Content::model(parts)),
                finish_reason: Some("STOP".to_string()),
                ..Default::default()
            }],
            prompt_feedback: None,
        }
    }
}

#[async_trait]
impl CompletionClient for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        self.requests.lock().await.push(request.clone());
        match self.script.lock().await.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(Self::reply(vec![Part::text("Mock response")])),
        }
    }
}
