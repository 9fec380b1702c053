//! Telegram implementation of the chat-transport boundary.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use teloxide::net::Download;
use teloxide::payloads::{EditMessageTextSetters, SendMessageSetters};
use teloxide::requests::Requester;
use teloxide::types::{BotCommand, ChatId as TgChatId, MessageId as TgMessageId, ParseMode};
use teloxide::Bot;

use crate::driver::ChatTransport;
use crate::models::ids::{ChatId, MessageId, MessageRef};
use crate::render::ControlView;
use crate::Result;

use super::keyboards;

/// Concrete [`ChatTransport`] over the Telegram Bot API.
///
/// Control messages render with legacy Markdown so the review pane's
/// fenced code block displays as fixed-width text.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Wrap a bot handle.
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl ChatTransport for TelegramTransport {
    fn post_control(
        &self,
        chat: ChatId,
        view: ControlView,
    ) -> Pin<Box<dyn Future<Output = Result<MessageRef>> + Send + '_>> {
        Box::pin(async move {
            let mut request = self
                .bot
                .send_message(TgChatId(chat.0), view.text)
                .parse_mode(ParseMode::Markdown);
            if let Some(markup) = keyboards::markup_for(view.keyboard) {
                request = request.reply_markup(markup);
            }
            let sent = request.await?;
            Ok(MessageRef::new(chat, MessageId(sent.id.0)))
        })
    }

    fn edit_control(
        &self,
        target: MessageRef,
        view: ControlView,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut request = self
                .bot
                .edit_message_text(
                    TgChatId(target.chat.0),
                    TgMessageId(target.message.0),
                    view.text,
                )
                .parse_mode(ParseMode::Markdown);
            if let Some(markup) = keyboards::markup_for(view.keyboard) {
                request = request.reply_markup(markup);
            }
            request.await?;
            Ok(())
        })
    }

    fn remove_message(
        &self,
        target: MessageRef,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.bot
                .delete_message(TgChatId(target.chat.0), TgMessageId(target.message.0))
                .await?;
            Ok(())
        })
    }

    fn fetch_voice(
        &self,
        file_id: &str,
        dest: &Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let file_id = file_id.to_owned();
        let dest = dest.to_path_buf();
        Box::pin(async move {
            let file = self.bot.get_file(file_id).await?;
            let mut out = tokio::fs::File::create(&dest).await?;
            self.bot.download_file(&file.path, &mut out).await?;
            Ok(())
        })
    }
}

/// Register the bot's command menu (the single `/process` entry).
///
/// # Errors
///
/// Returns `AppError::Telegram` if the API call fails.
pub async fn register_commands(bot: &Bot) -> Result<()> {
    let commands = vec![BotCommand::new("process", "Traiter la boîte de réception")];
    bot.set_my_commands(commands).await?;
    Ok(())
}
