use teloxide::prelude::*;
use teloxide::utils::html;

use super::state::{MyDialogue, State};
use super::{expect_text, invalid, keyboards, report, send_html, send_page, views, HandlerResult};
use crate::app::AppContext;
use crate::forms::{Progress, ReviewDraft};
use crate::models::{MedicineQuery, Role};
use crate::services;
use crate::utils::format_price;

/// Fetches the storefront for `query` and shows its first page.
pub async fn browse(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    query: MedicineQuery,
    heading: &str,
) -> HandlerResult {
    let chat = dialogue.chat_id();
    if let Err(e) = services::catalog::browse(ctx, chat, &query).await {
        return report(bot, dialogue, e).await;
    }
    ctx.views.shop_heading.insert(chat, heading.to_string());
    show_page(bot, ctx, dialogue, 1).await
}

pub async fn show_page(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, page: usize) -> HandlerResult {
    let chat = dialogue.chat_id();
    // Nothing cached yet, e.g. after a restart.
    if !ctx.views.shop.contains_key(&chat) {
        if let Err(e) = services::catalog::browse(ctx, chat, &MedicineQuery::default()).await {
            return report(bot, dialogue, e).await;
        }
        ctx.views.shop_heading.remove(&chat);
    }

    let heading = ctx
        .views
        .shop_heading
        .get(&chat)
        .map(|heading| heading.value().clone())
        .unwrap_or_else(|| "All medicines".to_string());
    let rendered = ctx.views.shop.get(&chat).map(|listing| {
        let page = listing.page(page, ctx.page_size);
        (views::shop_page(&page, &heading), keyboards::shop(&page))
    });

    match rendered {
        Some((text, markup)) => send_page(bot, chat, text, markup).await,
        None => Ok(()),
    }
}

pub async fn browse_category(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    category_id: String,
) -> HandlerResult {
    let chat = dialogue.chat_id();
    let name = match services::catalog::categories(ctx, chat).await {
        Ok(categories) => categories
            .into_iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name)
            .unwrap_or_else(|| "Category".to_string()),
        Err(e) => return report(bot, dialogue, e).await,
    };
    let query = MedicineQuery {
        search: None,
        category_id: Some(category_id),
    };
    browse(bot, ctx, dialogue, query, &name).await
}

pub async fn categories(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    let chat = dialogue.chat_id();
    let categories = match services::catalog::categories(ctx, chat).await {
        Ok(categories) => categories,
        Err(e) => return report(bot, dialogue, e).await,
    };
    let is_admin = match ctx.current_user(chat).await {
        Ok(user) => user.is_some_and(|u| u.role == Role::Admin),
        Err(e) => return report(bot, dialogue, e).await,
    };

    let mut text = views::categories(&categories);
    if is_admin {
        text.push_str("\n\nUse ✏️ to rename, 🗑 to delete, or /addcategory to create one.");
    }
    send_page(bot, chat, text, keyboards::categories(&categories, is_admin)).await
}

pub async fn show_medicine(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, id: &str) -> HandlerResult {
    let chat = dialogue.chat_id();
    let (medicine, reviews) = match services::catalog::medicine_detail(ctx, chat, id).await {
        Ok(detail) => detail,
        Err(e) => return report(bot, dialogue, e).await,
    };
    let role = match ctx.current_user(chat).await {
        Ok(user) => user.map(|u| u.role),
        Err(e) => return report(bot, dialogue, e).await,
    };
    send_page(
        bot,
        chat,
        views::medicine_detail(&medicine, &reviews),
        keyboards::medicine(&medicine, role),
    )
    .await
}

pub async fn add_to_cart(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    medicine_id: &str,
    quantity: u32,
) -> HandlerResult {
    let chat = dialogue.chat_id();
    match services::catalog::add_to_cart(ctx, chat, medicine_id, quantity).await {
        Ok(cart) => {
            let name = cart
                .get(medicine_id)
                .map(|item| item.medicine.name.clone())
                .unwrap_or_default();
            send_html(
                bot,
                chat,
                format!(
                    "🛒 Added {} × <b>{}</b>. Cart: {} items, {}. See /cart.",
                    quantity,
                    html::escape(&name),
                    cart.total_items(),
                    format_price(cart.total_price())
                ),
            )
            .await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}

pub async fn begin_review(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    medicine_id: String,
) -> HandlerResult {
    if let Err(e) = ctx.require_role(dialogue.chat_id(), Role::Customer).await {
        return report(bot, dialogue, e).await;
    }
    dialogue
        .update(State::Review(ReviewDraft::new(medicine_id)))
        .await?;
    bot.send_message(dialogue.chat_id(), ReviewDraft::PROMPT).await?;
    Ok(())
}

pub async fn receive_review(
    bot: Bot,
    msg: Message,
    ctx: AppContext,
    dialogue: MyDialogue,
    draft: ReviewDraft,
) -> HandlerResult {
    let Some(text) = expect_text(&bot, &msg).await? else {
        return Ok(());
    };
    let input = match draft.accept(text) {
        Ok(Progress::Next { draft, prompt }) => {
            dialogue.update(State::Review(draft)).await?;
            bot.send_message(msg.chat.id, prompt).await?;
            return Ok(());
        }
        Ok(Progress::Done(input)) => input,
        Err(e) => return invalid(&bot, msg.chat.id, e).await,
    };

    dialogue.update(State::Idle).await?;
    match services::catalog::post_review(&ctx, msg.chat.id, &input).await {
        Ok(_) => {
            bot.send_message(msg.chat.id, "⭐ Thanks for your review!")
                .await?;
            show_medicine(&bot, &ctx, &dialogue, &input.medicine_id).await
        }
        Err(e) => report(&bot, &dialogue, e).await,
    }
}
