//! Page flows, independent of how their results are rendered.

use dashmap::DashMap;
use teloxide::types::ChatId;

use crate::store::{Keyed, Listing, Pending};

pub mod account;
pub mod admin;
pub mod catalog;
pub mod checkout;
pub mod inventory;
pub mod notifications;
pub mod orders;

/// Applies `f` to the cached entry ahead of the server call.
fn stage<T: Keyed + Clone>(
    views: &DashMap<ChatId, Listing<T>>,
    chat: ChatId,
    key: &str,
    f: impl FnOnce(&mut T),
) -> Option<Pending<T>> {
    views
        .get_mut(&chat)
        .and_then(|mut listing| listing.patch(key, f))
}

fn stage_removal<T: Keyed + Clone>(
    views: &DashMap<ChatId, Listing<T>>,
    chat: ChatId,
    key: &str,
) -> Option<Pending<T>> {
    views
        .get_mut(&chat)
        .and_then(|mut listing| listing.remove(key))
}

fn confirm<T: Keyed + Clone>(
    views: &DashMap<ChatId, Listing<T>>,
    chat: ChatId,
    pending: Option<Pending<T>>,
    server: Option<T>,
) {
    match (pending, views.get_mut(&chat)) {
        (Some(pending), Some(mut listing)) => listing.reconcile(pending, server),
        (None, Some(mut listing)) => {
            if let Some(server) = server {
                listing.upsert(server);
            }
        }
        (_, None) => {}
    }
}

fn revert<T: Keyed + Clone>(views: &DashMap<ChatId, Listing<T>>, chat: ChatId, pending: Option<Pending<T>>) {
    if let (Some(pending), Some(mut listing)) = (pending, views.get_mut(&chat)) {
        log::warn!("Rolling back change to {} for chat {}", pending.key(), chat);
        listing.rollback(pending);
    }
}
