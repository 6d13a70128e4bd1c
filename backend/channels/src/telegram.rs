use std::sync::Arc;

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use eteon_agent::Relay;
use eteon_core::{
    CallbackEvent, ChatTransport, DeliveryError, RemoteFile, SendOptions, SentMessage,
};
use eteon_logging::redact_sensitive_data;

use crate::ChannelAdapter;
use crate::telegram_commands::Command;
use crate::telegram_inline::{classify_send_error, link_preview, to_markup};
use crate::telegram_media::inbound_message;

pub struct TelegramAdapter {
    bot: Bot,
}

impl TelegramAdapter {
    pub fn new(token: String) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

#[async_trait]
impl ChannelAdapter for TelegramAdapter {
    async fn run(&self, relay: Arc<Relay>) -> anyhow::Result<()> {
        info!("Starting Telegram adapter");

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %redact_sensitive_data(&e.to_string()), "Failed to register bot commands");
        }

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(on_command),
            )
            .branch(Update::filter_message().endpoint(on_message))
            .branch(Update::filter_callback_query().endpoint(on_callback));

        // No distribution key: updates from one chat run concurrently, so a button
        // press is never queued behind that chat's running round trip.
        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![relay])
            .distribution_function(|_| None::<std::convert::Infallible>)
            .default_handler(|_| async {})
            .build();

        let token = dispatcher.shutdown_token();
        tokio::spawn(async move {
            shutdown_signal().await;
            match token.shutdown() {
                Ok(done) => done.await,
                Err(e) => warn!(error = %e, "Dispatcher was not running at shutdown"),
            }
        });

        dispatcher.dispatch().await;
        info!("Telegram adapter stopped");
        Ok(())
    }
}

async fn on_command(msg: Message, cmd: Command, relay: Arc<Relay>) -> ResponseResult<()> {
    let chat = eteon_core::ChatId(msg.chat.id.0);
    let result = match cmd {
        Command::Start => relay.start(chat).await,
        Command::Settings => relay.show_settings(chat).await,
    };
    if let Err(e) = result {
        error!(chat_id = %chat, error = %e, "Command failed");
    }
    respond(())
}

async fn on_message(msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    let inbound = inbound_message(&msg);
    let chat = inbound.chat;
    if let Err(e) = relay.handle_message(inbound).await {
        error!(chat_id = %chat, error = %e, "Message relay failed");
    }
    respond(())
}

async fn on_callback(q: CallbackQuery, relay: Arc<Relay>) -> ResponseResult<()> {
    let chat = q
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(q.from.id.0 as i64));
    let event = CallbackEvent {
        id: q.id.clone(),
        chat: eteon_core::ChatId(chat.0),
        data: q.data.clone().unwrap_or_default(),
    };
    if let Err(e) = relay.handle_callback(event).await {
        error!(chat_id = chat.0, error = %e, "Callback failed");
    }
    respond(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}

#[async_trait]
impl ChatTransport for TelegramAdapter {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(
        &self,
        chat: eteon_core::ChatId,
        text: &str,
        options: &SendOptions,
    ) -> Result<SentMessage, DeliveryError> {
        let mut request = self
            .bot
            .send_message(ChatId(chat.0), text)
            .parse_mode(ParseMode::MarkdownV2)
            .link_preview_options(link_preview(options.link_preview));
        if let Some(keyboard) = &options.keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }

        let sent = request.await.map_err(classify_send_error)?;
        Ok(SentMessage {
            chat,
            message_id: sent.id.0,
        })
    }

    async fn edit(
        &self,
        message: &SentMessage,
        text: &str,
        options: &SendOptions,
    ) -> Result<SentMessage, DeliveryError> {
        let mut request = self
            .bot
            .edit_message_text(
                ChatId(message.chat.0),
                MessageId(message.message_id),
                text,
            )
            .parse_mode(ParseMode::MarkdownV2)
            .link_preview_options(link_preview(options.link_preview));
        if let Some(keyboard) = &options.keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }

        request.await.map_err(classify_send_error)?;
        Ok(*message)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), DeliveryError> {
        self.bot
            .answer_callback_query(callback_id.to_string())
            .await
            .map_err(|e| DeliveryError::Transport(redact_sensitive_data(&e.to_string())))?;
        Ok(())
    }

    async fn download(&self, file_id: &str) -> Result<RemoteFile, DeliveryError> {
        let file = self
            .bot
            .get_file(file_id.to_string())
            .await
            .map_err(|e| {
                DeliveryError::FileUnavailable(format!(
                    "get file: {}",
                    redact_sensitive_data(&e.to_string())
                ))
            })?;

        let mut bytes = Vec::new();
        self.bot
            .download_file(&file.path, &mut bytes)
            .await
            .map_err(|e| {
                DeliveryError::FileUnavailable(format!(
                    "download file: {}",
                    redact_sensitive_data(&e.to_string())
                ))
            })?;

        Ok(RemoteFile {
            path: file.path,
            bytes,
        })
    }
}
