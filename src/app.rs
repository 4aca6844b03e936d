use std::sync::Arc;

use dashmap::DashMap;
use teloxide::types::ChatId;

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::db::LocalStorage;
use crate::error::{AppError, AppResult};
use crate::models::{Medicine, Order, Role, User};
use crate::store::{AuthStore, CartRegistry, Listing};

/// Lists a chat is currently looking at, kept so that paging and row actions
/// work on what was rendered.
#[derive(Clone, Debug, Default)]
pub struct Views {
    pub shop: Arc<DashMap<ChatId, Listing<Medicine>>>,
    /// What the cached storefront shows, e.g. a search or a category.
    pub shop_heading: Arc<DashMap<ChatId, String>>,
    pub inventory: Arc<DashMap<ChatId, Listing<Medicine>>>,
    pub orders: Arc<DashMap<ChatId, Listing<Order>>>,
    pub users: Arc<DashMap<ChatId, Listing<User>>>,
}

impl Views {
    pub fn forget(&self, chat: ChatId) {
        self.shop.remove(&chat);
        self.shop_heading.remove(&chat);
        self.inventory.remove(&chat);
        self.orders.remove(&chat);
        self.users.remove(&chat);
    }
}

/// Signed-in user and bearer token of a chat.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Everything a handler needs, injected by the dispatcher.
#[derive(Clone, Debug)]
pub struct AppContext {
    pub api: ApiClient,
    pub auth: AuthStore,
    pub carts: CartRegistry,
    pub views: Views,
    pub page_size: usize,
}

impl AppContext {
    pub fn new(api: ApiClient, storage: LocalStorage, page_size: usize) -> Self {
        Self {
            api,
            auth: AuthStore::new(storage),
            carts: CartRegistry::new(),
            views: Views::default(),
            page_size: page_size.max(1),
        }
    }

    /// Converts an API result into a service result. A 401 from any endpoint
    /// signs the chat out.
    pub async fn settle<T>(&self, chat: ChatId, result: ApiResult<T>) -> AppResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(ApiError::Unauthorized) => {
                log::warn!("Session of chat {} rejected by the API, signing out", chat);
                self.auth.logout(chat).await?;
                self.views.forget(chat);
                Err(AppError::SessionExpired)
            }
            Err(e) => Err(AppError::Api(e)),
        }
    }

    /// Token of the chat, if any; public pages work without one.
    pub async fn token(&self, chat: ChatId) -> AppResult<Option<String>> {
        Ok(self.auth.state(chat).await?.token)
    }

    /// Signed-in user of the chat, if any.
    pub async fn current_user(&self, chat: ChatId) -> AppResult<Option<User>> {
        Ok(self.auth.state(chat).await?.user)
    }

    pub async fn session(&self, chat: ChatId) -> AppResult<Session> {
        let state = self.auth.state(chat).await?;
        match (state.user, state.token) {
            (Some(user), Some(token)) => Ok(Session { user, token }),
            _ => Err(AppError::NotSignedIn),
        }
    }

    pub async fn require_role(&self, chat: ChatId, role: Role) -> AppResult<Session> {
        let session = self.session(chat).await?;
        if session.user.role != role {
            return Err(AppError::Forbidden(role));
        }
        Ok(session)
    }

    /// Sellers and admins both manage orders.
    pub async fn require_staff(&self, chat: ChatId) -> AppResult<Session> {
        let session = self.session(chat).await?;
        match session.user.role {
            Role::Seller | Role::Admin => Ok(session),
            Role::Customer => Err(AppError::Forbidden(Role::Seller)),
        }
    }
}
