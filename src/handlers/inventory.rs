use teloxide::prelude::*;
use teloxide::utils::html;

use super::state::{MyDialogue, State};
use super::{expect_text, invalid, keyboards, report, send_html, send_page, views, HandlerResult};
use crate::app::AppContext;
use crate::forms::{MedicineDraft, Progress};
use crate::services;
use crate::utils::format_price;

/// Loads the seller's medicines and shows the first page.
pub async fn list(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    if let Err(e) = services::inventory::load_inventory(ctx, dialogue.chat_id()).await {
        return report(bot, dialogue, e).await;
    }
    show_page(bot, ctx, dialogue, 1).await
}

pub async fn show_page(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, page: usize) -> HandlerResult {
    let chat = dialogue.chat_id();
    if !ctx.views.inventory.contains_key(&chat) {
        if let Err(e) = services::inventory::load_inventory(ctx, chat).await {
            return report(bot, dialogue, e).await;
        }
    }
    let rendered = ctx.views.inventory.get(&chat).map(|listing| {
        let page = listing.page(page, ctx.page_size);
        (views::inventory_page(&page), keyboards::inventory(&page))
    });
    match rendered {
        Some((text, markup)) => send_page(bot, chat, text, markup).await,
        None => Ok(()),
    }
}

/// Opens the medicine editor for a new listing, or for `medicine_id`.
pub async fn begin_editor(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    medicine_id: Option<&str>,
) -> HandlerResult {
    let chat = dialogue.chat_id();
    let draft = match services::inventory::start_editor(ctx, chat, medicine_id).await {
        Ok(draft) => draft,
        Err(e) => return report(bot, dialogue, e).await,
    };
    let intro = if medicine_id.is_some() {
        "✏️ Editing medicine. Send - to keep a value, /cancel to stop."
    } else {
        "➕ New medicine. Send /cancel to stop."
    };
    let prompt = draft.prompt();
    dialogue.update(State::MedicineEditor(draft)).await?;
    bot.send_message(chat, intro).await?;
    bot.send_message(chat, prompt).await?;
    Ok(())
}

pub async fn receive_medicine(
    bot: Bot,
    msg: Message,
    ctx: AppContext,
    dialogue: MyDialogue,
    draft: MedicineDraft,
) -> HandlerResult {
    let Some(text) = expect_text(&bot, &msg).await? else {
        return Ok(());
    };
    let submission = match draft.accept(text) {
        Ok(Progress::Next { draft, prompt }) => {
            dialogue.update(State::MedicineEditor(draft)).await?;
            bot.send_message(msg.chat.id, prompt).await?;
            return Ok(());
        }
        Ok(Progress::Done(submission)) => submission,
        Err(e) => return invalid(&bot, msg.chat.id, e).await,
    };

    dialogue.update(State::Idle).await?;
    match services::inventory::save_medicine(&ctx, msg.chat.id, submission).await {
        Ok(medicine) => {
            send_html(
                &bot,
                msg.chat.id,
                format!(
                    "✅ <b>{}</b> saved: {}, {} in stock.",
                    html::escape(&medicine.name),
                    format_price(medicine.price),
                    medicine.stock
                ),
            )
            .await?;
            show_page(&bot, &ctx, &dialogue, 1).await
        }
        Err(e) => report(&bot, &dialogue, e).await,
    }
}

pub async fn delete(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, medicine_id: &str) -> HandlerResult {
    match services::inventory::delete_medicine(ctx, dialogue.chat_id(), medicine_id).await {
        Ok(()) => {
            bot.send_message(dialogue.chat_id(), "🗑 Medicine deleted.")
                .await?;
            show_page(bot, ctx, dialogue, 1).await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}
