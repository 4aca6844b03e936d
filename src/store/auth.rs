use std::sync::Arc;

use dashmap::DashMap;
use teloxide::types::ChatId;

use crate::db::{DatabaseError, LocalStorage};
use crate::models::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            is_loading: true,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

/// Auth sessions keyed by chat, cached in memory and persisted to local storage.
#[derive(Clone, Debug)]
pub struct AuthStore {
    storage: LocalStorage,
    sessions: Arc<DashMap<ChatId, AuthState>>,
}

impl AuthStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Loads the persisted token and user for `chat` and marks loading complete.
    pub async fn initialize(&self, chat: ChatId) -> Result<AuthState, DatabaseError> {
        let token = self.storage.get_item(chat, TOKEN_KEY).await?;
        let stored_user = self.storage.get_item(chat, USER_KEY).await?;

        let user = match stored_user {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("Discarding unreadable session for chat {}: {}", chat, e);
                    self.clear_storage(chat).await?;
                    return Ok(self.cache(chat, None, None));
                }
            },
            None => None,
        };

        Ok(self.cache(chat, user, token))
    }

    /// Cached state for `chat`, initializing it on first use.
    pub async fn state(&self, chat: ChatId) -> Result<AuthState, DatabaseError> {
        if let Some(state) = self.sessions.get(&chat) {
            return Ok(state.clone());
        }
        self.initialize(chat).await
    }

    pub async fn login(&self, chat: ChatId, user: User, token: String) -> Result<(), DatabaseError> {
        let raw = serde_json::to_string(&user)?;
        self.storage.set_item(chat, TOKEN_KEY, &token).await?;
        self.storage.set_item(chat, USER_KEY, &raw).await?;
        log::info!("Chat {} signed in as {} ({})", chat, user.email, user.role);
        self.cache(chat, Some(user), Some(token));
        Ok(())
    }

    pub async fn logout(&self, chat: ChatId) -> Result<(), DatabaseError> {
        self.clear_storage(chat).await?;
        self.cache(chat, None, None);
        log::info!("Chat {} signed out", chat);
        Ok(())
    }

    pub async fn update_user(&self, chat: ChatId, user: User) -> Result<(), DatabaseError> {
        let raw = serde_json::to_string(&user)?;
        self.storage.set_item(chat, USER_KEY, &raw).await?;
        let token = self.state(chat).await?.token;
        self.cache(chat, Some(user), token);
        Ok(())
    }

    async fn clear_storage(&self, chat: ChatId) -> Result<(), DatabaseError> {
        self.storage.remove_item(chat, TOKEN_KEY).await?;
        self.storage.remove_item(chat, USER_KEY).await
    }

    fn cache(&self, chat: ChatId, user: Option<User>, token: Option<String>) -> AuthState {
        let state = AuthState {
            user,
            token,
            is_loading: false,
        };
        self.sessions.insert(chat, state.clone());
        state
    }
}
