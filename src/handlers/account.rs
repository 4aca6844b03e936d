use teloxide::prelude::*;
use teloxide::utils::html;

use super::state::{MyDialogue, State};
use super::{expect_text, invalid, keyboards, report, send_html, send_with, views, HandlerResult};
use crate::app::AppContext;
use crate::forms::{LoginDraft, ProfileDraft, Progress, RegisterDraft};
use crate::models::User;
use crate::services;

pub async fn start(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    let chat = dialogue.chat_id();
    match ctx.current_user(chat).await {
        Ok(user) => {
            let role = user.as_ref().map(|u| u.role);
            send_with(bot, chat, views::welcome(user.as_ref()), keyboards::main_menu(role)).await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}

pub async fn help(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    match ctx.current_user(dialogue.chat_id()).await {
        Ok(user) => send_html(bot, dialogue.chat_id(), views::help(user.map(|u| u.role))).await,
        Err(e) => report(bot, dialogue, e).await,
    }
}

pub async fn menu(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    match ctx.current_user(dialogue.chat_id()).await {
        Ok(user) => {
            let role = user.map(|u| u.role);
            send_with(bot, dialogue.chat_id(), "Please choose an option:", keyboards::main_menu(role))
                .await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}

/// Starts a wizard only for signed-out chats.
async fn signed_out(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> Result<bool, super::Error> {
    match ctx.current_user(dialogue.chat_id()).await {
        Ok(None) => Ok(true),
        Ok(Some(user)) => {
            send_html(
                bot,
                dialogue.chat_id(),
                format!(
                    "You are already signed in as <b>{}</b>. Use /logout to switch accounts.",
                    html::escape(&user.email)
                ),
            )
            .await?;
            Ok(false)
        }
        Err(e) => {
            report(bot, dialogue, e).await?;
            Ok(false)
        }
    }
}

pub async fn begin_login(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    if !signed_out(bot, ctx, dialogue).await? {
        return Ok(());
    }
    dialogue.update(State::Login(LoginDraft::default())).await?;
    bot.send_message(dialogue.chat_id(), LoginDraft::PROMPT).await?;
    Ok(())
}

pub async fn receive_login(
    bot: Bot,
    msg: Message,
    ctx: AppContext,
    dialogue: MyDialogue,
    draft: LoginDraft,
) -> HandlerResult {
    let Some(text) = expect_text(&bot, &msg).await? else {
        return Ok(());
    };
    let request = match draft.accept(text) {
        Ok(Progress::Next { draft, prompt }) => {
            dialogue.update(State::Login(draft)).await?;
            bot.send_message(msg.chat.id, prompt).await?;
            return Ok(());
        }
        Ok(Progress::Done(request)) => request,
        Err(e) => return invalid(&bot, msg.chat.id, e).await,
    };

    // The password stays out of the chat history.
    if let Err(e) = bot.delete_message(msg.chat.id, msg.id).await {
        log::debug!("Could not delete password message: {}", e);
    }

    match services::account::login(&ctx, msg.chat.id, request).await {
        Ok(user) => {
            dialogue.update(State::Idle).await?;
            signed_in(&bot, msg.chat.id, &user).await
        }
        Err(e) => {
            report(&bot, &dialogue, e).await?;
            dialogue.update(State::Login(LoginDraft::default())).await?;
            bot.send_message(msg.chat.id, LoginDraft::PROMPT).await?;
            Ok(())
        }
    }
}

pub async fn begin_registration(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    if !signed_out(bot, ctx, dialogue).await? {
        return Ok(());
    }
    dialogue.update(State::Register(RegisterDraft::default())).await?;
    bot.send_message(dialogue.chat_id(), RegisterDraft::PROMPT).await?;
    Ok(())
}

pub async fn receive_registration(
    bot: Bot,
    msg: Message,
    ctx: AppContext,
    dialogue: MyDialogue,
    draft: RegisterDraft,
) -> HandlerResult {
    let Some(text) = expect_text(&bot, &msg).await? else {
        return Ok(());
    };
    let request = match draft.accept(text) {
        Ok(Progress::Next { draft, prompt }) => {
            dialogue.update(State::Register(draft)).await?;
            bot.send_message(msg.chat.id, prompt).await?;
            return Ok(());
        }
        Ok(Progress::Done(request)) => request,
        Err(e) => return invalid(&bot, msg.chat.id, e).await,
    };

    dialogue.update(State::Idle).await?;
    match services::account::register(&ctx, msg.chat.id, request).await {
        Ok(user) => signed_in(&bot, msg.chat.id, &user).await,
        Err(e) => {
            report(&bot, &dialogue, e).await?;
            bot.send_message(msg.chat.id, "Send /register to try again.")
                .await?;
            Ok(())
        }
    }
}

async fn signed_in(bot: &Bot, chat: ChatId, user: &User) -> HandlerResult {
    send_with(
        bot,
        chat,
        views::welcome(Some(user)),
        keyboards::main_menu(Some(user.role)),
    )
    .await
}

pub async fn logout(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    let chat = dialogue.chat_id();
    match services::account::logout(ctx, chat).await {
        Ok(()) => send_with(bot, chat, "👋 You have been signed out.", keyboards::main_menu(None)).await,
        Err(e) => report(bot, dialogue, e).await,
    }
}

pub async fn profile(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    match services::account::profile(ctx, dialogue.chat_id()).await {
        Ok(user) => send_html(bot, dialogue.chat_id(), views::profile(&user)).await,
        Err(e) => report(bot, dialogue, e).await,
    }
}

pub async fn begin_profile_edit(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    if let Err(e) = ctx.session(dialogue.chat_id()).await {
        return report(bot, dialogue, e).await;
    }
    dialogue.update(State::EditProfile(ProfileDraft::default())).await?;
    bot.send_message(dialogue.chat_id(), ProfileDraft::PROMPT).await?;
    Ok(())
}

pub async fn receive_profile(
    bot: Bot,
    msg: Message,
    ctx: AppContext,
    dialogue: MyDialogue,
    draft: ProfileDraft,
) -> HandlerResult {
    let Some(text) = expect_text(&bot, &msg).await? else {
        return Ok(());
    };
    let update = match draft.accept(text) {
        Ok(Progress::Next { draft, prompt }) => {
            dialogue.update(State::EditProfile(draft)).await?;
            bot.send_message(msg.chat.id, prompt).await?;
            return Ok(());
        }
        Ok(Progress::Done(update)) => update,
        Err(e) => return invalid(&bot, msg.chat.id, e).await,
    };

    dialogue.update(State::Idle).await?;
    match services::account::update_profile(&ctx, msg.chat.id, update).await {
        Ok(user) => {
            send_html(
                &bot,
                msg.chat.id,
                format!("✅ Profile updated.\n\n{}", views::profile(&user)),
            )
            .await
        }
        Err(e) => report(&bot, &dialogue, e).await,
    }
}
