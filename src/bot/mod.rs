//! Telegram bot module - teloxide front end for the conversation engine

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup},
    utils::command::BotCommands,
};
use tracing::{error, info, warn};

use crate::engine::{ConversationEngine, ConversationHandler, InboundEvent, Menu, OutboundReply};
use crate::store::ChatIdentity;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type Engine = Arc<ConversationEngine>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Команды бота:")]
pub enum Command {
    #[command(description = "Открыть меню")]
    Start,
    #[command(description = "Показать помощь")]
    Help,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
        }
    }
}

impl From<ChatId> for ChatIdentity {
    fn from(id: ChatId) -> Self {
        ChatIdentity(id.0)
    }
}

/// Inline keyboard for a reply menu
fn make_keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = menu
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.action.id()))
                .collect()
        })
        .collect();

    InlineKeyboardMarkup::new(buttons)
}

/// Deliver a reply. Failures are logged, never retried; the store keeps
/// whatever the engine already committed.
async fn send_reply(bot: &Bot, chat_id: ChatId, reply: OutboundReply) {
    let request = bot.send_message(chat_id, reply.text);
    let result = match &reply.menu {
        Some(menu) => request.reply_markup(make_keyboard(menu)).await,
        None => request.await,
    };

    if let Err(e) = result {
        error!("Failed to send reply to {}: {}", chat_id, e);
    }
}

/// Start the Telegram bot
pub async fn run_bot(token: String) -> anyhow::Result<()> {
    let bot = Bot::new(token);
    let engine: Engine = Arc::new(ConversationEngine::new());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            Update::filter_message()
                .endpoint(handle_message),
        )
        .branch(
            Update::filter_callback_query()
                .endpoint(handle_callback),
        );

    info!("Bot started");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine.clone()])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped, {} chats seen", engine.store().chat_count());
    Ok(())
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command, engine: Engine) -> HandlerResult {
    let event = InboundEvent::Command(cmd.name().to_string());
    let reply = engine.handle(msg.chat.id.into(), event);
    send_reply(&bot, msg.chat.id, reply).await;
    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, engine: Engine) -> HandlerResult {
    // Stickers, photos and the like carry no text to interpret
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let reply = engine.handle(msg.chat.id.into(), InboundEvent::from_text(text));
    send_reply(&bot, msg.chat.id, reply).await;
    Ok(())
}

async fn handle_callback(bot: Bot, q: CallbackQuery, engine: Engine) -> HandlerResult {
    if let (Some(data), Some(msg)) = (&q.data, &q.message) {
        let chat_id = msg.chat().id;

        let reply = engine.handle(chat_id.into(), InboundEvent::ButtonPress(data.clone()));
        send_reply(&bot, chat_id, reply).await;

        // Drop the buttons from the pressed message
        if let Err(e) = bot.edit_message_reply_markup(chat_id, msg.id()).await {
            warn!("Failed to remove buttons in {}: {}", chat_id, e);
        }
    }

    if let Err(e) = bot.answer_callback_query(q.id).await {
        warn!("Failed to answer callback query: {}", e);
    }
    Ok(())
}
