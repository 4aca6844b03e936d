use teloxide::types::ChatId;

use super::{confirm, revert, stage};
use crate::app::{AppContext, Session};
use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderStatus, Role};
use crate::store::Listing;

/// Loads the orders the chat's role can see: own orders for customers,
/// orders containing their items for sellers, everything for admins.
/// Newest first. Returns the role the list was loaded for.
pub async fn load_orders(ctx: &AppContext, chat: ChatId) -> AppResult<Role> {
    let session = ctx.session(chat).await?;
    let orders = fetch_orders(ctx, chat, &session).await?;
    ctx.views.orders.insert(chat, Listing::new(orders));
    Ok(session.user.role)
}

pub(crate) async fn fetch_orders(
    ctx: &AppContext,
    chat: ChatId,
    session: &Session,
) -> AppResult<Vec<Order>> {
    let token = session.token.as_str();
    let result = match session.user.role {
        Role::Customer => ctx.api.orders(token).list().await,
        Role::Seller => ctx.api.seller(token).orders().await,
        Role::Admin => ctx.api.admin(token).orders().await,
    };
    let mut orders = ctx.settle(chat, result).await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(orders)
}

pub async fn order_detail(ctx: &AppContext, chat: ChatId, order_id: &str) -> AppResult<Order> {
    if let Some(order) = cached(ctx, chat, order_id) {
        return Ok(order);
    }
    let session = ctx.session(chat).await?;
    ctx.settle(chat, ctx.api.orders(&session.token).get(order_id).await)
        .await
}

/// Cancels one of the customer's own orders. Only placed orders qualify.
pub async fn cancel_order(ctx: &AppContext, chat: ChatId, order_id: &str) -> AppResult<Order> {
    let session = ctx.session(chat).await?;
    let order = match cached(ctx, chat, order_id) {
        Some(order) => order,
        None => {
            ctx.settle(chat, ctx.api.orders(&session.token).get(order_id).await)
                .await?
        }
    };
    order
        .status
        .transition(OrderStatus::Cancelled, Role::Customer)?;

    let pending = stage(&ctx.views.orders, chat, order_id, |order| {
        order.status = OrderStatus::Cancelled
    });
    let result = ctx
        .settle(chat, ctx.api.orders(&session.token).cancel(order_id).await)
        .await;

    match result {
        Ok(order) => {
            log::info!("Order {} cancelled by {}", order.id, session.user.email);
            confirm(&ctx.views.orders, chat, pending, Some(order.clone()));
            Ok(order)
        }
        Err(e) => {
            revert(&ctx.views.orders, chat, pending);
            Err(e)
        }
    }
}

/// Moves an order to `status` on behalf of a seller or admin.
pub async fn update_status(
    ctx: &AppContext,
    chat: ChatId,
    order_id: &str,
    status: OrderStatus,
) -> AppResult<Order> {
    let session = ctx.require_staff(chat).await?;
    let role = session.user.role;
    let current = cached(ctx, chat, order_id)
        .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))?;
    current.status.transition(status, role)?;

    let pending = stage(&ctx.views.orders, chat, order_id, |order| order.status = status);
    let token = session.token.as_str();
    let result = match role {
        Role::Admin => ctx.api.admin(token).update_order_status(order_id, status).await,
        _ => ctx.api.seller(token).update_order_status(order_id, status).await,
    };

    match ctx.settle(chat, result).await {
        Ok(order) => {
            log::info!(
                "Order {} moved from {} to {} by {}",
                order.id,
                current.status,
                order.status,
                session.user.email
            );
            confirm(&ctx.views.orders, chat, pending, Some(order.clone()));
            Ok(order)
        }
        Err(e) => {
            revert(&ctx.views.orders, chat, pending);
            Err(e)
        }
    }
}

fn cached(ctx: &AppContext, chat: ChatId, order_id: &str) -> Option<Order> {
    ctx.views
        .orders
        .get(&chat)
        .and_then(|listing| listing.find(order_id).cloned())
}
