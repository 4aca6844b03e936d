use teloxide::prelude::*;
use teloxide::utils::html;

use super::state::{MyDialogue, State};
use super::{expect_text, invalid, keyboards, report, send_html, send_page, shop, views, HandlerResult};
use crate::app::AppContext;
use crate::forms::parse_category;
use crate::models::Role;
use crate::services;

pub async fn list_users(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    if let Err(e) = services::admin::load_users(ctx, dialogue.chat_id()).await {
        return report(bot, dialogue, e).await;
    }
    show_users_page(bot, ctx, dialogue, 1).await
}

pub async fn show_users_page(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, page: usize) -> HandlerResult {
    let chat = dialogue.chat_id();
    let session = match ctx.require_role(chat, Role::Admin).await {
        Ok(session) => session,
        Err(e) => return report(bot, dialogue, e).await,
    };
    if !ctx.views.users.contains_key(&chat) {
        if let Err(e) = services::admin::load_users(ctx, chat).await {
            return report(bot, dialogue, e).await;
        }
    }
    let rendered = ctx.views.users.get(&chat).map(|listing| {
        let page = listing.page(page, ctx.page_size);
        (views::users_page(&page), keyboards::users(&page, &session.user.id))
    });
    match rendered {
        Some((text, markup)) => send_page(bot, chat, text, markup).await,
        None => Ok(()),
    }
}

pub async fn toggle_user(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, user_id: &str) -> HandlerResult {
    let chat = dialogue.chat_id();
    match services::admin::toggle_user_status(ctx, chat, user_id).await {
        Ok(user) => {
            send_html(
                bot,
                chat,
                format!(
                    "<b>{}</b> is now {}.",
                    html::escape(&user.email),
                    user.status.as_str()
                ),
            )
            .await?;
            show_users_page(bot, ctx, dialogue, page_of(ctx, chat, user_id)).await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}

pub async fn delete_user(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, user_id: &str) -> HandlerResult {
    let chat = dialogue.chat_id();
    let page = page_of(ctx, chat, user_id);
    match services::admin::delete_user(ctx, chat, user_id).await {
        Ok(()) => {
            bot.send_message(chat, "🗑 User deleted.").await?;
            show_users_page(bot, ctx, dialogue, page).await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}

fn page_of(ctx: &AppContext, chat: ChatId, user_id: &str) -> usize {
    ctx.views
        .users
        .get(&chat)
        .and_then(|listing| listing.items().iter().position(|u| u.id == user_id))
        .map(|index| index / ctx.page_size + 1)
        .unwrap_or(1)
}

/// Asks for a category name, to create one or to rename `category_id`.
pub async fn begin_category_editor(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    category_id: Option<String>,
) -> HandlerResult {
    if let Err(e) = ctx.require_role(dialogue.chat_id(), Role::Admin).await {
        return report(bot, dialogue, e).await;
    }
    let prompt = if category_id.is_some() {
        "Send the new name, optionally followed by | and a description:"
    } else {
        "Send the category name, optionally followed by | and a description:"
    };
    dialogue
        .update(State::CategoryEditor {
            editing: category_id,
        })
        .await?;
    bot.send_message(dialogue.chat_id(), prompt).await?;
    Ok(())
}

pub async fn receive_category(
    bot: Bot,
    msg: Message,
    ctx: AppContext,
    dialogue: MyDialogue,
    editing: Option<String>,
) -> HandlerResult {
    let Some(text) = expect_text(&bot, &msg).await? else {
        return Ok(());
    };
    let input = match parse_category(text) {
        Ok(input) => input,
        Err(e) => return invalid(&bot, msg.chat.id, e).await,
    };

    dialogue.update(State::Idle).await?;
    match services::admin::save_category(&ctx, msg.chat.id, editing.as_deref(), &input).await {
        Ok(category) => {
            send_html(
                &bot,
                msg.chat.id,
                format!("✅ Category <b>{}</b> saved.", html::escape(&category.name)),
            )
            .await?;
            shop::categories(&bot, &ctx, &dialogue).await
        }
        Err(e) => report(&bot, &dialogue, e).await,
    }
}

pub async fn delete_category(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    category_id: &str,
) -> HandlerResult {
    match services::admin::delete_category(ctx, dialogue.chat_id(), category_id).await {
        Ok(()) => {
            bot.send_message(dialogue.chat_id(), "🗑 Category deleted.")
                .await?;
            shop::categories(bot, ctx, dialogue).await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}
