use teloxide::prelude::*;

use super::state::{MyDialogue, State};
use super::{expect_text, invalid, keyboards, report, send_html, send_page, send_with, views, HandlerResult};
use crate::app::AppContext;
use crate::error::AppError;
use crate::forms::{CheckoutDraft, Progress, ShippingDetails};
use crate::models::Role;
use crate::services;
use crate::store::Cart;

async fn render(bot: &Bot, chat: ChatId, cart: &Cart) -> HandlerResult {
    send_page(bot, chat, views::cart(cart), keyboards::cart(cart)).await
}

pub async fn show(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    let chat = dialogue.chat_id();
    render(bot, chat, &ctx.carts.snapshot(chat)).await
}

pub async fn change_quantity(
    bot: &Bot,
    ctx: &AppContext,
    dialogue: &MyDialogue,
    medicine_id: &str,
    delta: i64,
) -> HandlerResult {
    match services::checkout::change_quantity(ctx, dialogue.chat_id(), medicine_id, delta) {
        Ok(cart) => render(bot, dialogue.chat_id(), &cart).await,
        Err(e) => report(bot, dialogue, e).await,
    }
}

pub async fn remove_item(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue, medicine_id: &str) -> HandlerResult {
    let cart = services::checkout::remove_item(ctx, dialogue.chat_id(), medicine_id);
    render(bot, dialogue.chat_id(), &cart).await
}

/// Starts the shipping wizard, prefilled from the customer's profile.
pub async fn begin_checkout(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    let chat = dialogue.chat_id();
    let session = match ctx.require_role(chat, Role::Customer).await {
        Ok(session) => session,
        Err(e) => return report(bot, dialogue, e).await,
    };
    if ctx.carts.snapshot(chat).is_empty() {
        return report(bot, dialogue, AppError::EmptyCart).await;
    }

    let draft = CheckoutDraft::for_user(&session.user);
    let prompt = draft.prompt();
    dialogue.update(State::Checkout(draft)).await?;
    send_html(
        bot,
        chat,
        "📦 <b>Checkout</b>\nPayment is cash on delivery. Send /cancel to stop.",
    )
    .await?;
    bot.send_message(chat, prompt).await?;
    Ok(())
}

pub async fn receive_shipping(
    bot: Bot,
    msg: Message,
    ctx: AppContext,
    dialogue: MyDialogue,
    draft: CheckoutDraft,
) -> HandlerResult {
    let Some(text) = expect_text(&bot, &msg).await? else {
        return Ok(());
    };
    let shipping = match draft.accept(text) {
        Ok(Progress::Next { draft, prompt }) => {
            dialogue.update(State::Checkout(draft)).await?;
            bot.send_message(msg.chat.id, prompt).await?;
            return Ok(());
        }
        Ok(Progress::Done(shipping)) => shipping,
        Err(e) => return invalid(&bot, msg.chat.id, e).await,
    };

    let cart = ctx.carts.snapshot(msg.chat.id);
    let summary = views::checkout_summary(&cart, &shipping);
    dialogue.update(State::ConfirmOrder(shipping)).await?;
    send_with(&bot, msg.chat.id, summary, keyboards::confirm_order()).await
}

pub async fn awaiting_confirmation(bot: Bot, msg: Message, _shipping: ShippingDetails) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Please use the buttons above to place the order, or send /cancel.",
    )
    .await?;
    Ok(())
}

pub async fn confirm_order(bot: &Bot, ctx: &AppContext, dialogue: &MyDialogue) -> HandlerResult {
    let chat = dialogue.chat_id();
    let Some(State::ConfirmOrder(shipping)) = dialogue.get().await? else {
        bot.send_message(chat, "There is nothing to confirm. Start with /checkout.")
            .await?;
        return Ok(());
    };

    match services::checkout::place_order(ctx, chat, &shipping).await {
        Ok(order) => {
            dialogue.update(State::Idle).await?;
            send_html(bot, chat, views::order_placed(&order)).await
        }
        Err(e) => report(bot, dialogue, e).await,
    }
}

pub async fn abort_checkout(bot: &Bot, dialogue: &MyDialogue) -> HandlerResult {
    dialogue.update(State::Idle).await?;
    bot.send_message(dialogue.chat_id(), "Checkout cancelled. Your cart is still there.")
        .await?;
    Ok(())
}
