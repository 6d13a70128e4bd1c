//! Telegram Bot Commands
//!
//! Routes `/start` and `/settings` to the relay.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Eteon commands:")]
pub enum Command {
    #[command(description = "show the welcome message.")]
    Start,
    #[command(description = "choose how much the model may think.")]
    Settings,
}
