use teloxide::types::ChatId;

use crate::app::AppContext;
use crate::error::{AppError, AppResult};
use crate::models::{Category, Medicine, MedicineQuery, Review, ReviewInput};
use crate::store::{Cart, Listing};

/// Fetches the storefront for `query` and caches it for paging. Returns the
/// number of medicines found.
pub async fn browse(ctx: &AppContext, chat: ChatId, query: &MedicineQuery) -> AppResult<usize> {
    let token = ctx.token(chat).await?;
    let medicines = ctx
        .settle(chat, ctx.api.medicines(token.as_deref()).list(query).await)
        .await?;
    let found = medicines.len();
    ctx.views.shop.insert(chat, Listing::new(medicines));
    Ok(found)
}

pub async fn categories(ctx: &AppContext, chat: ChatId) -> AppResult<Vec<Category>> {
    let token = ctx.token(chat).await?;
    ctx.settle(chat, ctx.api.medicines(token.as_deref()).categories().await)
        .await
}

pub async fn medicine_detail(
    ctx: &AppContext,
    chat: ChatId,
    medicine_id: &str,
) -> AppResult<(Medicine, Vec<Review>)> {
    let token = ctx.token(chat).await?;
    let medicine = ctx
        .settle(chat, ctx.api.medicines(token.as_deref()).get(medicine_id).await)
        .await?;
    let reviews = ctx
        .settle(
            chat,
            ctx.api.reviews(token.as_deref()).for_medicine(medicine_id).await,
        )
        .await?;
    Ok((medicine, reviews))
}

/// Adds `quantity` units after checking the fresh stock level, since the
/// cart itself does not enforce it.
pub async fn add_to_cart(
    ctx: &AppContext,
    chat: ChatId,
    medicine_id: &str,
    quantity: u32,
) -> AppResult<Cart> {
    let token = ctx.token(chat).await?;
    let medicine = ctx
        .settle(chat, ctx.api.medicines(token.as_deref()).get(medicine_id).await)
        .await?;

    let in_cart = ctx.carts.snapshot(chat).quantity_of(&medicine.id);
    let available = medicine.stock.saturating_sub(in_cart);
    if quantity > available {
        return Err(AppError::OutOfStock {
            name: medicine.name,
            available,
        });
    }

    log::info!("Chat {} added {} x {}", chat, quantity, medicine.name);
    Ok(ctx.carts.update(chat, |cart| {
        cart.add_to_cart(medicine, quantity);
        cart.clone()
    }))
}

pub async fn post_review(ctx: &AppContext, chat: ChatId, input: &ReviewInput) -> AppResult<Review> {
    let session = ctx.session(chat).await?;
    let review = ctx
        .settle(chat, ctx.api.reviews(Some(&session.token)).create(input).await)
        .await?;
    log::info!(
        "{} reviewed medicine {} with {} stars",
        session.user.email,
        input.medicine_id,
        input.rating
    );
    Ok(review)
}
