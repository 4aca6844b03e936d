use teloxide::prelude::*;

use super::state::MyDialogue;
use super::{keyboards, report, send_html, send_page, views, HandlerResult};
use crate::app::AppContext;
use crate::error::AppError;
use crate::models::{OrderStatus, Role};
use crate::services;
use crate::utils::short_id;

/// Loads the orders page for `expected` (customer orders, seller sales or
/// the admin's all-orders page) and shows its first page.
pub async fn list(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    expected: Option<Role>,
) -> HandlerResult {
    let chat = dialogue.chat_id();
    if let Some(role) = expected {
        if let Err(e) = ctx.require_role(chat, role).await {
            return report(bot, dialogue, e).await;
        }
    }
    if let Err(e) = services::orders::load_orders(ctx, chat).await {
        return report(bot, dialogue, e).await;
    }
    show_page(bot, ctx, dialogue, 1).await
}

pub async fn show_page(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, page: usize) -> HandlerResult {
    let chat = dialogue.chat_id();
    let role = match ctx.session(chat).await {
        Ok(session) => session.user.role,
        Err(e) => return report(bot, dialogue, e).await,
    };
    if !ctx.views.orders.contains_key(&chat) {
        if let Err(e) = services::orders::load_orders(ctx, chat).await {
            return report(bot, dialogue, e).await;
        }
    }

    let rendered = ctx.views.orders.get(&chat).map(|listing| {
        let page = listing.page(page, ctx.page_size);
        (views::orders_page(&page, role), keyboards::orders(&page, role))
    });
    match rendered {
        Some((text, markup)) => send_page(bot, chat, text, markup).await,
        None => Ok(()),
    }
}

pub async fn cancel(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, order_id: &str) -> HandlerResult {
    let chat = dialogue.chat_id();
    match services::orders::cancel_order(ctx, chat, order_id).await {
        Ok(order) => {
            send_html(bot, chat, format!("❌ Order #{} cancelled.", short_id(&order.id))).await?;
            show_page(bot, ctx, dialogue, page_of(ctx, chat, order_id)).await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}

pub async fn set_status(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    order_id: &str,
    status: OrderStatus,
) -> HandlerResult {
    let chat = dialogue.chat_id();
    match services::orders::update_status(ctx, chat, order_id, status).await {
        Ok(order) => {
            send_html(
                bot,
                chat,
                format!(
                    "{} Order #{} is now <b>{}</b>.",
                    order.status.emoji(),
                    short_id(&order.id),
                    order.status
                ),
            )
            .await?;
            show_page(bot, ctx, dialogue, page_of(ctx, chat, order_id)).await
        }
        // The list may be stale: show the server's view again.
        Err(e @ AppError::NotFound(_)) => {
            report(bot, dialogue, e).await?;
            list(bot, ctx, dialogue, None).await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}

/// Page of the cached orders list holding `order_id`.
fn page_of(ctx: &AppContext, chat: ChatId, order_id: &str) -> usize {
    ctx.views
        .orders
        .get(&chat)
        .and_then(|listing| listing.items().iter().position(|o| o.id == order_id))
        .map(|index| index / ctx.page_size + 1)
        .unwrap_or(1)
}
