use teloxide::types::ChatId;

use crate::app::AppContext;
use crate::error::AppResult;
use crate::models::{LoginRequest, ProfileUpdate, RegisterRequest, User};

/// Creates the account and signs the chat in with it.
pub async fn register(ctx: &AppContext, chat: ChatId, request: RegisterRequest) -> AppResult<User> {
    let user = ctx
        .settle(chat, ctx.api.auth(None).register(&request).await)
        .await?;
    log::info!("Registered {} as {}", user.email, user.role);
    login(
        ctx,
        chat,
        LoginRequest {
            email: request.email,
            password: request.password,
        },
    )
    .await
}

pub async fn login(ctx: &AppContext, chat: ChatId, request: LoginRequest) -> AppResult<User> {
    let payload = ctx
        .settle(chat, ctx.api.auth(None).sign_in(&request).await)
        .await?;
    ctx.auth
        .login(chat, payload.user.clone(), payload.token)
        .await?;
    ctx.views.forget(chat);
    Ok(payload.user)
}

pub async fn logout(ctx: &AppContext, chat: ChatId) -> AppResult<()> {
    ctx.auth.logout(chat).await?;
    ctx.views.forget(chat);
    Ok(())
}

/// Re-reads the profile from the server and refreshes the cached user.
pub async fn profile(ctx: &AppContext, chat: ChatId) -> AppResult<User> {
    let session = ctx.session(chat).await?;
    let user = ctx
        .settle(chat, ctx.api.auth(Some(&session.token)).me().await)
        .await?;
    ctx.auth.update_user(chat, user.clone()).await?;
    Ok(user)
}

pub async fn update_profile(ctx: &AppContext, chat: ChatId, update: ProfileUpdate) -> AppResult<User> {
    let session = ctx.session(chat).await?;
    if update == ProfileUpdate::default() {
        return Ok(session.user);
    }
    let user = ctx
        .settle(
            chat,
            ctx.api.auth(Some(&session.token)).update_profile(&update).await,
        )
        .await?;
    ctx.auth.update_user(chat, user.clone()).await?;
    log::info!("Updated profile of {}", user.email);
    Ok(user)
}
