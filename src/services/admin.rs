use teloxide::types::ChatId;

use super::{confirm, revert, stage, stage_removal};
use crate::app::AppContext;
use crate::error::{AppError, AppResult};
use crate::models::{Category, CategoryInput, Role, User};
use crate::store::Listing;

pub async fn load_users(ctx: &AppContext, chat: ChatId) -> AppResult<usize> {
    let session = ctx.require_role(chat, Role::Admin).await?;
    let users = ctx
        .settle(chat, ctx.api.admin(&session.token).users().await)
        .await?;
    let count = users.len();
    ctx.views.users.insert(chat, Listing::new(users));
    Ok(count)
}

/// Bans an active user or reinstates a banned one.
pub async fn toggle_user_status(ctx: &AppContext, chat: ChatId, user_id: &str) -> AppResult<User> {
    let session = ctx.require_role(chat, Role::Admin).await?;
    if session.user.id == user_id {
        return Err(AppError::OwnAccount);
    }
    let target = cached(ctx, chat, user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;
    let status = target.status.toggled();

    let pending = stage(&ctx.views.users, chat, user_id, |user| user.status = status);
    let result = ctx
        .settle(
            chat,
            ctx.api
                .admin(&session.token)
                .update_user_status(user_id, status)
                .await,
        )
        .await;

    match result {
        Ok(user) => {
            log::info!("{} set {} to {}", session.user.email, user.email, user.status.as_str());
            confirm(&ctx.views.users, chat, pending, Some(user.clone()));
            Ok(user)
        }
        Err(e) => {
            revert(&ctx.views.users, chat, pending);
            Err(e)
        }
    }
}

pub async fn delete_user(ctx: &AppContext, chat: ChatId, user_id: &str) -> AppResult<()> {
    let session = ctx.require_role(chat, Role::Admin).await?;
    if session.user.id == user_id {
        return Err(AppError::OwnAccount);
    }
    let pending = stage_removal(&ctx.views.users, chat, user_id);
    let result = ctx
        .settle(chat, ctx.api.admin(&session.token).delete_user(user_id).await)
        .await;

    match result {
        Ok(()) => {
            log::info!("{} deleted user {}", session.user.email, user_id);
            confirm(&ctx.views.users, chat, pending, None);
            Ok(())
        }
        Err(e) => {
            revert(&ctx.views.users, chat, pending);
            Err(e)
        }
    }
}

/// Creates a category, or renames the one with `category_id`.
pub async fn save_category(
    ctx: &AppContext,
    chat: ChatId,
    category_id: Option<&str>,
    input: &CategoryInput,
) -> AppResult<Category> {
    let session = ctx.require_role(chat, Role::Admin).await?;
    let admin = ctx.api.admin(&session.token);
    let result = match category_id {
        Some(id) => admin.update_category(id, input).await,
        None => admin.create_category(input).await,
    };
    let category = ctx.settle(chat, result).await?;
    log::info!("{} saved category {}", session.user.email, category.name);
    Ok(category)
}

pub async fn delete_category(ctx: &AppContext, chat: ChatId, category_id: &str) -> AppResult<()> {
    let session = ctx.require_role(chat, Role::Admin).await?;
    ctx.settle(
        chat,
        ctx.api.admin(&session.token).delete_category(category_id).await,
    )
    .await?;
    log::info!("{} deleted category {}", session.user.email, category_id);
    Ok(())
}

fn cached(ctx: &AppContext, chat: ChatId, user_id: &str) -> Option<User> {
    ctx.views
        .users
        .get(&chat)
        .and_then(|listing| listing.find(user_id).cloned())
}
