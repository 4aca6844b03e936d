use teloxide::types::ChatId;

use crate::app::AppContext;
use crate::error::{AppError, AppResult};
use crate::forms::ShippingDetails;
use crate::models::{CreateOrderRequest, Order, OrderItemInput, PaymentMethod};
use crate::store::Cart;

/// Changes the quantity of a cart line by `delta`, bounded by the stock seen
/// when the medicine was added. Reaching zero removes the line.
pub fn change_quantity(ctx: &AppContext, chat: ChatId, medicine_id: &str, delta: i64) -> AppResult<Cart> {
    let cart = ctx.carts.snapshot(chat);
    let item = cart
        .get(medicine_id)
        .ok_or_else(|| AppError::NotFound("That item".to_string()))?;

    let wanted = i64::from(item.quantity) + delta;
    if delta > 0 && wanted > i64::from(item.medicine.stock) {
        return Err(AppError::OutOfStock {
            name: item.medicine.name.clone(),
            available: item.medicine.stock.saturating_sub(item.quantity),
        });
    }

    Ok(ctx.carts.update(chat, |cart| {
        cart.update_quantity(medicine_id, wanted);
        cart.clone()
    }))
}

pub fn remove_item(ctx: &AppContext, chat: ChatId, medicine_id: &str) -> Cart {
    ctx.carts.update(chat, |cart| {
        cart.remove(medicine_id);
        cart.clone()
    })
}

pub fn order_request(cart: &Cart, shipping: &ShippingDetails) -> CreateOrderRequest {
    CreateOrderRequest {
        items: cart
            .items()
            .iter()
            .map(|item| OrderItemInput {
                medicine_id: item.medicine.id.clone(),
                seller_id: item.medicine.seller_id.clone(),
                quantity: item.quantity,
                price: item.medicine.price,
            })
            .collect(),
        shipping_name: shipping.name.clone(),
        shipping_address: shipping.address.clone(),
        shipping_phone: shipping.phone.clone(),
        payment_method: PaymentMethod::CashOnDelivery,
        total_amount: cart.total_price(),
    }
}

/// Places a cash-on-delivery order for the chat's cart. The cart is emptied
/// only once the server has accepted the order.
pub async fn place_order(ctx: &AppContext, chat: ChatId, shipping: &ShippingDetails) -> AppResult<Order> {
    let session = ctx.session(chat).await?;
    let cart = ctx.carts.snapshot(chat);
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let request = order_request(&cart, shipping);
    let order = ctx
        .settle(chat, ctx.api.orders(&session.token).create(&request).await)
        .await?;

    ctx.carts.clear(chat);
    ctx.views.orders.remove(&chat);
    log::info!(
        "Order {} placed by {} for {:.2}",
        order.id,
        session.user.email,
        order.total_amount
    );
    Ok(order)
}
