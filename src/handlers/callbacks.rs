//! Inline button payloads and the callback query endpoint.
//!
//! Payloads are `verb:arg[:arg]` strings; Telegram caps them at 64 bytes,
//! which server ids (24-36 characters) fit comfortably.

use std::fmt;
use std::str::FromStr;

use teloxide::prelude::*;

use super::state::MyDialogue;
use super::{admin, cart, inventory, order, shop, HandlerResult};
use crate::app::AppContext;
use crate::models::OrderStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    ShopPage(usize),
    Medicine(String),
    AddToCart { medicine_id: String, quantity: u32 },
    Review(String),
    Category(String),
    RenameCategory(String),
    DeleteCategory(String),
    CartIncrement(String),
    CartDecrement(String),
    CartRemove(String),
    Checkout,
    ConfirmOrder,
    AbortCheckout,
    OrdersPage(usize),
    CancelOrder(String),
    SetStatus { order_id: String, status: OrderStatus },
    InventoryPage(usize),
    EditMedicine(String),
    DeleteMedicine(String),
    UsersPage(usize),
    ToggleUser(String),
    DeleteUser(String),
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::ShopPage(page) => write!(f, "shop:{}", page),
            CallbackAction::Medicine(id) => write!(f, "med:{}", id),
            CallbackAction::AddToCart {
                medicine_id,
                quantity,
            } => write!(f, "add:{}:{}", medicine_id, quantity),
            CallbackAction::Review(id) => write!(f, "review:{}", id),
            CallbackAction::Category(id) => write!(f, "cat:{}", id),
            CallbackAction::RenameCategory(id) => write!(f, "editcat:{}", id),
            CallbackAction::DeleteCategory(id) => write!(f, "delcat:{}", id),
            CallbackAction::CartIncrement(id) => write!(f, "inc:{}", id),
            CallbackAction::CartDecrement(id) => write!(f, "dec:{}", id),
            CallbackAction::CartRemove(id) => write!(f, "rm:{}", id),
            CallbackAction::Checkout => f.write_str("checkout"),
            CallbackAction::ConfirmOrder => f.write_str("confirm"),
            CallbackAction::AbortCheckout => f.write_str("abort"),
            CallbackAction::OrdersPage(page) => write!(f, "orders:{}", page),
            CallbackAction::CancelOrder(id) => write!(f, "cancel:{}", id),
            CallbackAction::SetStatus { order_id, status } => {
                write!(f, "status:{}:{}", order_id, status)
            }
            CallbackAction::InventoryPage(page) => write!(f, "inv:{}", page),
            CallbackAction::EditMedicine(id) => write!(f, "editmed:{}", id),
            CallbackAction::DeleteMedicine(id) => write!(f, "delmed:{}", id),
            CallbackAction::UsersPage(page) => write!(f, "users:{}", page),
            CallbackAction::ToggleUser(id) => write!(f, "toggle:{}", id),
            CallbackAction::DeleteUser(id) => write!(f, "deluser:{}", id),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let verb = parts.next().unwrap_or_default();
        let arg = parts.next().filter(|arg| !arg.is_empty());
        let extra = parts.next();

        let id = || arg.map(str::to_string).ok_or("Missing id");
        let page = || {
            arg.and_then(|arg| arg.parse::<usize>().ok())
                .ok_or("Invalid page number")
        };

        let action = match verb {
            "shop" => CallbackAction::ShopPage(page()?),
            "med" => CallbackAction::Medicine(id()?),
            "add" => CallbackAction::AddToCart {
                medicine_id: id()?,
                quantity: extra
                    .and_then(|q| q.parse::<u32>().ok())
                    .filter(|q| *q > 0)
                    .ok_or("Invalid quantity")?,
            },
            "review" => CallbackAction::Review(id()?),
            "cat" => CallbackAction::Category(id()?),
            "editcat" => CallbackAction::RenameCategory(id()?),
            "delcat" => CallbackAction::DeleteCategory(id()?),
            "inc" => CallbackAction::CartIncrement(id()?),
            "dec" => CallbackAction::CartDecrement(id()?),
            "rm" => CallbackAction::CartRemove(id()?),
            "checkout" => CallbackAction::Checkout,
            "confirm" => CallbackAction::ConfirmOrder,
            "abort" => CallbackAction::AbortCheckout,
            "orders" => CallbackAction::OrdersPage(page()?),
            "cancel" => CallbackAction::CancelOrder(id()?),
            "status" => CallbackAction::SetStatus {
                order_id: id()?,
                status: extra.ok_or("Missing status")?.parse()?,
            },
            "inv" => CallbackAction::InventoryPage(page()?),
            "editmed" => CallbackAction::EditMedicine(id()?),
            "delmed" => CallbackAction::DeleteMedicine(id()?),
            "users" => CallbackAction::UsersPage(page()?),
            "toggle" => CallbackAction::ToggleUser(id()?),
            "deluser" => CallbackAction::DeleteUser(id()?),
            _ => return Err("Unknown action"),
        };
        Ok(action)
    }
}

/// Entry point for every inline button press.
pub async fn handle(bot: Bot, q: CallbackQuery, ctx: AppContext, dialogue: MyDialogue) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let action = match data.parse::<CallbackAction>() {
        Ok(action) => action,
        Err(e) => {
            log::warn!("Ignoring callback {:?}: {}", data, e);
            return Ok(());
        }
    };
    log::debug!("Callback {} from chat {}", action, dialogue.chat_id());

    match action {
        CallbackAction::ShopPage(page) => shop::show_page(&bot, &ctx, &dialogue, page).await,
        CallbackAction::Medicine(id) => shop::show_medicine(&bot, &ctx, &dialogue, &id).await,
        CallbackAction::AddToCart {
            medicine_id,
            quantity,
        } => shop::add_to_cart(&bot, &ctx, &dialogue, &medicine_id, quantity).await,
        CallbackAction::Review(id) => shop::begin_review(&bot, &ctx, &dialogue, id).await,
        CallbackAction::Category(id) => shop::browse_category(&bot, &ctx, &dialogue, id).await,
        CallbackAction::RenameCategory(id) => {
            admin::begin_category_editor(&bot, &ctx, &dialogue, Some(id)).await
        }
        CallbackAction::DeleteCategory(id) => admin::delete_category(&bot, &ctx, &dialogue, &id).await,
        CallbackAction::CartIncrement(id) => cart::change_quantity(&bot, &ctx, &dialogue, &id, 1).await,
        CallbackAction::CartDecrement(id) => cart::change_quantity(&bot, &ctx, &dialogue, &id, -1).await,
        CallbackAction::CartRemove(id) => cart::remove_item(&bot, &ctx, &dialogue, &id).await,
        CallbackAction::Checkout => cart::begin_checkout(&bot, &ctx, &dialogue).await,
        CallbackAction::ConfirmOrder => cart::confirm_order(&bot, &ctx, &dialogue).await,
        CallbackAction::AbortCheckout => cart::abort_checkout(&bot, &dialogue).await,
        CallbackAction::OrdersPage(page) => order::show_page(&bot, &ctx, &dialogue, page).await,
        CallbackAction::CancelOrder(id) => order::cancel(&bot, &ctx, &dialogue, &id).await,
        CallbackAction::SetStatus { order_id, status } => {
            order::set_status(&bot, &ctx, &dialogue, &order_id, status).await
        }
        CallbackAction::InventoryPage(page) => inventory::show_page(&bot, &ctx, &dialogue, page).await,
        CallbackAction::EditMedicine(id) => {
            inventory::begin_editor(&bot, &ctx, &dialogue, Some(&id)).await
        }
        CallbackAction::DeleteMedicine(id) => inventory::delete(&bot, &ctx, &dialogue, &id).await,
        CallbackAction::UsersPage(page) => admin::show_users_page(&bot, &ctx, &dialogue, page).await,
        CallbackAction::ToggleUser(id) => admin::toggle_user(&bot, &ctx, &dialogue, &id).await,
        CallbackAction::DeleteUser(id) => admin::delete_user(&bot, &ctx, &dialogue, &id).await,
    }
}
