use teloxide::types::ChatId;

use super::{confirm, revert, stage_removal};
use crate::app::AppContext;
use crate::error::{AppError, AppResult};
use crate::forms::{MedicineDraft, MedicineSubmission};
use crate::models::{Medicine, Role};
use crate::services::catalog;
use crate::store::Listing;

/// Loads the seller's own medicines. Returns how many there are.
pub async fn load_inventory(ctx: &AppContext, chat: ChatId) -> AppResult<usize> {
    let session = ctx.require_role(chat, Role::Seller).await?;
    let medicines = ctx
        .settle(chat, ctx.api.seller(&session.token).medicines().await)
        .await?;
    let count = medicines.len();
    ctx.views.inventory.insert(chat, Listing::new(medicines));
    Ok(count)
}

/// Opens the medicine editor, for a new listing or for one in the inventory.
pub async fn start_editor(
    ctx: &AppContext,
    chat: ChatId,
    medicine_id: Option<&str>,
) -> AppResult<MedicineDraft> {
    ctx.require_role(chat, Role::Seller).await?;
    let categories = catalog::categories(ctx, chat).await?;
    match medicine_id {
        None => Ok(MedicineDraft::create(categories)),
        Some(id) => {
            let medicine = cached(ctx, chat, id)
                .ok_or_else(|| AppError::NotFound(format!("Medicine {}", id)))?;
            Ok(MedicineDraft::edit(medicine, categories))
        }
    }
}

pub async fn save_medicine(
    ctx: &AppContext,
    chat: ChatId,
    submission: MedicineSubmission,
) -> AppResult<Medicine> {
    let session = ctx.require_role(chat, Role::Seller).await?;
    let seller = ctx.api.seller(&session.token);
    let result = match &submission.id {
        Some(id) => seller.update_medicine(id, &submission.input).await,
        None => seller.create_medicine(&submission.input).await,
    };
    let medicine = ctx.settle(chat, result).await?;

    log::info!(
        "{} {} medicine {} ({} in stock)",
        session.user.email,
        if submission.id.is_some() { "updated" } else { "listed" },
        medicine.name,
        medicine.stock
    );
    confirm(&ctx.views.inventory, chat, None, Some(medicine.clone()));
    Ok(medicine)
}

/// Removes a listing. The row disappears at once and comes back if the
/// server refuses.
pub async fn delete_medicine(ctx: &AppContext, chat: ChatId, medicine_id: &str) -> AppResult<()> {
    let session = ctx.require_role(chat, Role::Seller).await?;
    let pending = stage_removal(&ctx.views.inventory, chat, medicine_id);
    let result = ctx
        .settle(
            chat,
            ctx.api.seller(&session.token).delete_medicine(medicine_id).await,
        )
        .await;

    match result {
        Ok(()) => {
            log::info!("{} deleted medicine {}", session.user.email, medicine_id);
            confirm(&ctx.views.inventory, chat, pending, None);
            Ok(())
        }
        Err(e) => {
            revert(&ctx.views.inventory, chat, pending);
            Err(e)
        }
    }
}

fn cached(ctx: &AppContext, chat: ChatId, medicine_id: &str) -> Option<Medicine> {
    ctx.views
        .inventory
        .get(&chat)
        .and_then(|listing| listing.find(medicine_id).cloned())
}
