//! Telegram surface of the store: commands, reply-menu labels, inline
//! buttons and dialogue wizards.

use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::dptree::case;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode, ReplyMarkup};
use teloxide::utils::html;

use crate::error::AppError;
use crate::forms::LoginDraft;
use crate::validation::ValidationError;

pub mod account;
pub mod admin;
pub mod callbacks;
pub mod cart;
pub mod commands;
pub mod inventory;
pub mod keyboards;
pub mod order;
pub mod shop;
pub mod state;
pub mod views;

pub use commands::Command;
pub use state::{MyDialogue, State};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type HandlerResult = Result<(), Error>;

/// The dispatcher tree.
///
/// Commands always win, so `/cancel` or `/menu` work in the middle of a
/// wizard. Other text goes to the wizard the chat is in, or to the reply-menu
/// when it is idle.
pub fn schema() -> UpdateHandler<Error> {
    let messages = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(commands::answer),
        )
        .branch(case![State::Login(draft)].endpoint(account::receive_login))
        .branch(case![State::Register(draft)].endpoint(account::receive_registration))
        .branch(case![State::EditProfile(draft)].endpoint(account::receive_profile))
        .branch(case![State::Checkout(draft)].endpoint(cart::receive_shipping))
        .branch(case![State::ConfirmOrder(shipping)].endpoint(cart::awaiting_confirmation))
        .branch(case![State::Review(draft)].endpoint(shop::receive_review))
        .branch(case![State::MedicineEditor(draft)].endpoint(inventory::receive_medicine))
        .branch(case![State::CategoryEditor { editing }].endpoint(admin::receive_category))
        .branch(dptree::endpoint(commands::handle_message));

    dialogue::enter::<Update, InMemStorage<State>, State, _>()
        .branch(messages)
        .branch(Update::filter_callback_query().endpoint(callbacks::handle))
}

pub(crate) async fn send_html(bot: &Bot, chat: ChatId, text: impl Into<String>) -> HandlerResult {
    bot.send_message(chat, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

pub(crate) async fn send_with(
    bot: &Bot,
    chat: ChatId,
    text: impl Into<String>,
    markup: impl Into<ReplyMarkup>,
) -> HandlerResult {
    bot.send_message(chat, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await?;
    Ok(())
}

/// Sends `text` with inline buttons, leaving out an empty keyboard.
pub(crate) async fn send_page(
    bot: &Bot,
    chat: ChatId,
    text: impl Into<String>,
    markup: InlineKeyboardMarkup,
) -> HandlerResult {
    if markup.inline_keyboard.is_empty() {
        send_html(bot, chat, text).await
    } else {
        send_with(bot, chat, text, markup).await
    }
}

/// Shows a service error as a ⚠️ toast. An expired session also drops the
/// chat into the login wizard.
pub(crate) async fn report(bot: &Bot, dialogue: &MyDialogue, error: AppError) -> HandlerResult {
    let chat = dialogue.chat_id();
    if error.is_internal() {
        log::error!("Chat {}: {}", chat, error);
    } else {
        log::debug!("Chat {}: {}", chat, error);
    }
    send_html(bot, chat, format!("⚠️ {}", html::escape(&error.to_string()))).await?;

    if let Some((state, prompt)) = follow_up(&error) {
        dialogue.update(state).await?;
        bot.send_message(chat, prompt).await?;
    }
    Ok(())
}

/// The wizard a chat is sent to after `error`, with its opening prompt.
pub fn follow_up(error: &AppError) -> Option<(State, &'static str)> {
    match error {
        AppError::SessionExpired => Some((State::Login(LoginDraft::default()), LoginDraft::PROMPT)),
        _ => None,
    }
}

/// Re-asks a wizard step after a validation error.
pub(crate) async fn invalid(bot: &Bot, chat: ChatId, error: ValidationError) -> HandlerResult {
    bot.send_message(chat, format!("⚠️ {} Please try again.", error))
        .await?;
    Ok(())
}

/// Text of a wizard answer; non-text messages are asked again.
pub(crate) async fn expect_text<'a>(bot: &Bot, msg: &'a Message) -> Result<Option<&'a str>, Error> {
    match msg.text() {
        Some(text) => Ok(Some(text)),
        None => {
            bot.send_message(msg.chat.id, "Please send a text message.")
                .await?;
            Ok(None)
        }
    }
}
