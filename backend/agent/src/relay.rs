//! Message relay between a chat transport and a completion service.
//!
//! Every inbound message runs one round trip under its conversation's lock: collect
//! parts, call the model, render the reply, record history, deliver. Button presses
//! and commands read the artifact store or the session settings.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

use eteon_core::{
    CallbackAction, CallbackEvent, ChatId, ChatTransport, CompletionClient, Content,
    EteonError, GenerateRequest, GenerateResponse, InboundMessage, MediaAttachment, Part,
    SendOptions, SentMessage, ThinkingLevel, Tool,
};
use eteon_logging::{EventLogger, RelayEvent};
use eteon_markdown::CodeBlockFormatter;
use eteon_media::MediaPayload;

use crate::artifacts::ArtifactStore;
use crate::delivery::{edit_with_fallback, send_with_fallback};
use crate::render::{
    render_response, response_keyboard, settings_keyboard, sources_list, strip_thoughts,
    thoughts_summary,
};
use crate::session_state::SessionStore;
use crate::system_prompt::PromptBuilder;

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const WELCOME: &str =
    "Hi, I am Eteon. Share a prompt, a link, or media and I will respond concisely.";
const NOTICE_MEDIA_FAILED: &str = "I could not process that input.";
const NOTICE_NO_INPUT: &str = "Please send text or supported media.";
const NOTICE_COMPLETION_FAILED: &str = "Eteon could not complete that request.";
const NOTICE_BLOCKED: &str = "The request was blocked by safety filters.";
const NOTICE_NO_CONTENT: &str = "No content received.";
const NOTICE_NO_THOUGHTS: &str = "Reasoning summary is unavailable.";
const NOTICE_NO_SOURCES: &str = "No sources available for this reply.";
const NOTICE_NO_CODE: &str = "No executable code was used for this reply.";
const THOUGHTS_PLACEHOLDER: &str = "Summarising thoughts...";

/// Tunables for a [`Relay`].
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub model: String,
    pub request_timeout: Duration,
    pub default_thinking: ThinkingLevel,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_thinking: ThinkingLevel::default(),
        }
    }
}

pub struct Relay {
    transport: Arc<dyn ChatTransport>,
    client: Arc<dyn CompletionClient>,
    sessions: SessionStore,
    artifacts: ArtifactStore,
    settings: RelaySettings,
    system_instruction: Content,
    tools: Vec<Tool>,
}

impl Relay {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        client: Arc<dyn CompletionClient>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            transport,
            client,
            sessions: SessionStore::new(settings.default_thinking),
            artifacts: ArtifactStore::new(),
            settings,
            system_instruction: PromptBuilder::system_instruction(),
            tools: PromptBuilder::tools(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Relay one user message to the model and deliver the reply.
    ///
    /// Failures are reported to the user with a short notice and then returned.
    #[instrument(skip(self, message), fields(chat_id = %message.chat))]
    pub async fn handle_message(&self, message: InboundMessage) -> Result<(), EteonError> {
        let chat = message.chat;
        let session = self.sessions.get_or_create(chat).await;
        let mut state = session.lock().await;

        let parts = match self.collect_parts(&message).await {
            Ok(parts) => parts,
            Err(e) => {
                error!(error = %e, "Failed to collect message parts");
                self.notify_failure(chat, NOTICE_MEDIA_FAILED).await;
                return Err(e);
            }
        };
        if parts.is_empty() {
            self.notify(chat, NOTICE_NO_INPUT).await?;
            return Ok(());
        }

        let media_parts = parts.iter().filter(|p| p.inline_data.is_some()).count();
        EventLogger::log_event(
            chat.0,
            RelayEvent::MessageReceived {
                text_parts: parts.len() - media_parts,
                media_parts,
            },
        );

        let user_turn = Content::user(parts);
        let thinking = state.current_thinking();
        let request = PromptBuilder::build_request(
            &self.settings.model,
            state.conversation_with(&user_turn),
            thinking,
            &self.system_instruction,
            &self.tools,
        );

        let started = Instant::now();
        let response = match self.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Completion request failed");
                EventLogger::log_event(
                    chat.0,
                    RelayEvent::CompletionFailed {
                        error_msg: e.to_string(),
                    },
                );
                self.notify_failure(chat, NOTICE_COMPLETION_FAILED).await;
                return Err(e);
            }
        };

        if let Some(reason) = response.block_reason() {
            warn!(reason, "Request blocked by safety filters");
            EventLogger::log_event(
                chat.0,
                RelayEvent::RequestBlocked {
                    reason: reason.to_string(),
                },
            );
            self.notify_failure(chat, NOTICE_BLOCKED).await;
            return Ok(());
        }

        let rendered = render_response(&response);
        let model_turn = response
            .first_candidate()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(strip_thoughts);
        state.append_turn(Some(user_turn), model_turn);

        EventLogger::log_event(
            chat.0,
            RelayEvent::CompletionFinished {
                latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                reply_chars: rendered.text.chars().count(),
                thoughts: rendered.artifacts.thoughts.len(),
                sources: rendered.artifacts.sources.len(),
                code_snippets: rendered.artifacts.code_snippets.len(),
            },
        );

        let keyboard = self
            .artifacts
            .store(Some(rendered.artifacts.clone()))
            .await
            .map(|key| response_keyboard(&key, &rendered.artifacts));

        let reply = if rendered.text.is_empty() {
            NOTICE_NO_CONTENT
        } else {
            rendered.text.as_str()
        };
        send_with_fallback(
            self.transport.as_ref(),
            chat,
            reply,
            &SendOptions::with_keyboard(keyboard),
        )
        .await?;
        Ok(())
    }

    /// Reply to `/start`.
    pub async fn start(&self, chat: ChatId) -> Result<(), EteonError> {
        self.notify(chat, WELCOME).await?;
        Ok(())
    }

    /// Reply to `/settings` with the current level and a button per level.
    pub async fn show_settings(&self, chat: ChatId) -> Result<(), EteonError> {
        let session = self.sessions.get_or_create(chat).await;
        let current = session.lock().await.current_thinking();
        let body = format!("Current thinking budget: {}", current.label());
        send_with_fallback(
            self.transport.as_ref(),
            chat,
            &body,
            &SendOptions::with_keyboard(Some(settings_keyboard())),
        )
        .await?;
        Ok(())
    }

    /// Acknowledge a button press and act on its payload.
    #[instrument(skip(self, event), fields(chat_id = %event.chat, data = %event.data))]
    pub async fn handle_callback(&self, event: CallbackEvent) -> Result<(), EteonError> {
        if let Err(e) = self.transport.answer_callback(&event.id).await {
            warn!(error = %e, "Failed to acknowledge callback");
        }

        let Some(action) = CallbackAction::parse(&event.data) else {
            debug!("Ignoring unknown callback payload");
            return Ok(());
        };

        match action {
            CallbackAction::ShowThoughts(key) => self.show_thoughts(event.chat, &key).await,
            CallbackAction::ShowSources(key) => self.show_sources(event.chat, &key).await,
            CallbackAction::ShowCode(key) => self.show_code(event.chat, &key).await,
            CallbackAction::SetThinking(level) => self.set_thinking(event.chat, level).await,
        }
    }

    async fn show_thoughts(&self, chat: ChatId, key: &str) -> Result<(), EteonError> {
        let body = self
            .artifacts
            .lookup(key)
            .await
            .and_then(|bundle| thoughts_summary(&bundle.thoughts))
            .unwrap_or_else(|| NOTICE_NO_THOUGHTS.to_string());

        let placeholder = self.notify(chat, THOUGHTS_PLACEHOLDER).await?;
        edit_with_fallback(
            self.transport.as_ref(),
            &placeholder,
            &body,
            &SendOptions::plain(),
        )
        .await?;
        Ok(())
    }

    async fn show_sources(&self, chat: ChatId, key: &str) -> Result<(), EteonError> {
        let bundle = self.artifacts.lookup(key).await;
        match bundle.filter(|b| !b.sources.is_empty()) {
            Some(bundle) => {
                send_with_fallback(
                    self.transport.as_ref(),
                    chat,
                    &sources_list(&bundle.sources),
                    &SendOptions::with_link_preview(),
                )
                .await?;
            }
            None => {
                self.notify(chat, NOTICE_NO_SOURCES).await?;
            }
        }
        Ok(())
    }

    async fn show_code(&self, chat: ChatId, key: &str) -> Result<(), EteonError> {
        let body = self
            .artifacts
            .lookup(key)
            .await
            .filter(|b| !b.code_snippets.is_empty())
            .map(|b| CodeBlockFormatter::format_all(&b.code_snippets))
            .unwrap_or_else(|| NOTICE_NO_CODE.to_string());
        self.notify(chat, &body).await?;
        Ok(())
    }

    async fn set_thinking(&self, chat: ChatId, level: ThinkingLevel) -> Result<(), EteonError> {
        let session = self.sessions.get_or_create(chat).await;
        session.lock().await.set_thinking(level);
        info!(level = %level, "Thinking budget changed");

        let body = format!("Thinking budget switched to {}", level.label());
        self.notify(chat, &body).await?;
        Ok(())
    }

    /// Text parts first, then one inline part per attachment.
    async fn collect_parts(&self, message: &InboundMessage) -> Result<Vec<Part>, EteonError> {
        let mut parts = Vec::new();

        let text = message.text.as_deref().map(str::trim).unwrap_or_default();
        if !text.is_empty() {
            parts.push(Part::text(text));
        }
        let caption = message.caption.as_deref().map(str::trim).unwrap_or_default();
        if !caption.is_empty() && caption != text {
            parts.push(Part::text(caption));
        }

        let mut attachments: Vec<&MediaAttachment> = message.attachments.iter().collect();
        attachments.sort_by_key(|attachment| attachment.kind);

        for attachment in attachments {
            let kind = attachment.kind.as_str();
            let file = self
                .transport
                .download(&attachment.file_id)
                .await
                .map_err(|e| EteonError::MediaRetrieval(format!("{kind}: {e}")))?;
            if file.bytes.is_empty() {
                return Err(EteonError::MediaRetrieval(format!("{kind}: empty media payload")));
            }

            let payload =
                MediaPayload::resolve(attachment.mime_hint.as_deref(), &file.path, file.bytes);
            debug!(kind, mime_type = %payload.mime_type, bytes = payload.data.len(), "Attached media");
            parts.push(Part::inline(payload.mime_type, payload.data));
        }

        Ok(parts)
    }

    async fn complete(&self, request: &GenerateRequest) -> Result<GenerateResponse, EteonError> {
        let provider = self.client.name().to_string();
        match timeout(self.settings.request_timeout, self.client.generate(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(EteonError::Completion {
                provider,
                message: format!("{e:#}"),
            }),
            Err(_) => Err(EteonError::Completion {
                provider,
                message: format!(
                    "timed out after {}s",
                    self.settings.request_timeout.as_secs_f32()
                ),
            }),
        }
    }

    async fn notify(&self, chat: ChatId, text: &str) -> Result<SentMessage, EteonError> {
        Ok(send_with_fallback(self.transport.as_ref(), chat, text, &SendOptions::plain()).await?)
    }

    /// Notice on a failure path; a delivery error here is only logged.
    async fn notify_failure(&self, chat: ChatId, text: &str) {
        if let Err(e) = self.notify(chat, text).await {
            warn!(error = %e, "Failed to deliver notice");
        }
    }
}
