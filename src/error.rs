use thiserror::Error;

use crate::api::ApiError;
use crate::db::DatabaseError;
use crate::models::Role;
use crate::order_status::TransitionError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Api(ApiError),
    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,
    #[error("Please /login first.")]
    NotSignedIn,
    #[error("This page is only available to {0} accounts.")]
    Forbidden(Role),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Only {available} more unit(s) of {name} can be added.")]
    OutOfStock { name: String, available: u32 },
    #[error("You cannot change your own account from here.")]
    OwnAccount,
    #[error("Your cart is empty.")]
    EmptyCart,
    #[error("{0} is no longer listed. Please refresh the page.")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Errors that say something about the server or the bot itself rather
    /// than about what the user typed or clicked.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_)
                | AppError::Api(ApiError::Decode(_))
                | AppError::Api(ApiError::MissingData)
        )
    }
}
