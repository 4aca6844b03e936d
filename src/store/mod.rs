//! Client-side state owned by the bot: auth sessions, carts and cached lists.

pub mod auth;
pub mod cart;
pub mod listing;

pub use auth::{AuthState, AuthStore};
pub use cart::{Cart, CartItem, CartRegistry};
pub use listing::{Keyed, Listing, Page, Pending};
