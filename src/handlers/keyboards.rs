use phf::phf_map;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use super::callbacks::CallbackAction;
use crate::models::{Category, Medicine, Order, Role, User, UserStatus};
use crate::store::{Cart, Page};
use crate::utils::{short_id, truncate};

/// Pages reachable from the reply keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Shop,
    Categories,
    Cart,
    Orders,
    Profile,
    Inventory,
    AddMedicine,
    Sales,
    Users,
    AllOrders,
    Login,
    Register,
    Logout,
    Help,
}

pub static MENU: phf::Map<&'static str, MenuAction> = phf_map! {
    "💊 Shop" => MenuAction::Shop,
    "🗂 Categories" => MenuAction::Categories,
    "🛒 Cart" => MenuAction::Cart,
    "📦 My Orders" => MenuAction::Orders,
    "👤 Profile" => MenuAction::Profile,
    "🏪 Inventory" => MenuAction::Inventory,
    "➕ Add Medicine" => MenuAction::AddMedicine,
    "📈 Sales" => MenuAction::Sales,
    "👥 Users" => MenuAction::Users,
    "📋 All Orders" => MenuAction::AllOrders,
    "🔑 Login" => MenuAction::Login,
    "📝 Register" => MenuAction::Register,
    "🚪 Logout" => MenuAction::Logout,
    "❓ Help" => MenuAction::Help,
};

fn label(action: MenuAction) -> &'static str {
    MENU.entries()
        .find(|(_, a)| **a == action)
        .map(|(label, _)| *label)
        .unwrap_or("❓ Help")
}

fn row(actions: &[MenuAction]) -> Vec<KeyboardButton> {
    actions.iter().map(|a| KeyboardButton::new(label(*a))).collect()
}

/// Reply keyboard for the chat's role; signed-out chats get the public menu.
pub fn main_menu(role: Option<Role>) -> KeyboardMarkup {
    use MenuAction::*;

    let mut rows = vec![row(&[Shop, Categories, Cart])];
    match role {
        None => rows.push(row(&[Login, Register])),
        Some(Role::Customer) => rows.push(row(&[Orders, Profile])),
        Some(Role::Seller) => {
            rows.push(row(&[Inventory, AddMedicine]));
            rows.push(row(&[Sales, Profile]));
        }
        Some(Role::Admin) => {
            rows.push(row(&[Users, AllOrders]));
            rows.push(row(&[Profile]));
        }
    }
    if role.is_some() {
        rows.push(row(&[Help, Logout]));
    } else {
        rows.push(row(&[Help]));
    }
    KeyboardMarkup::new(rows).resize_keyboard()
}

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.to_string())
}

fn pager<T>(page: &Page<'_, T>, to: fn(usize) -> CallbackAction) -> Vec<InlineKeyboardButton> {
    let mut buttons = Vec::new();
    if page.has_previous() {
        buttons.push(button("◀️ Prev", to(page.number - 1)));
    }
    if page.has_next() {
        buttons.push(button("Next ▶️", to(page.number + 1)));
    }
    buttons
}

pub fn shop(page: &Page<'_, Medicine>) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = page
        .items
        .iter()
        .map(|m| vec![button(truncate(&m.name, 40), CallbackAction::Medicine(m.id.clone()))])
        .collect();
    let nav = pager(page, CallbackAction::ShopPage);
    if !nav.is_empty() {
        rows.push(nav);
    }
    InlineKeyboardMarkup::new(rows)
}

pub fn medicine(medicine: &Medicine, role: Option<Role>) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    if medicine.in_stock() && !matches!(role, Some(Role::Seller | Role::Admin)) {
        let add = |quantity| CallbackAction::AddToCart {
            medicine_id: medicine.id.clone(),
            quantity,
        };
        let mut add_row = vec![button("🛒 Add 1", add(1))];
        if medicine.stock >= 3 {
            add_row.push(button("🛒 Add 3", add(3)));
        }
        rows.push(add_row);
    }
    if role == Some(Role::Customer) {
        rows.push(vec![button("⭐ Write a review", CallbackAction::Review(medicine.id.clone()))]);
    }
    rows.push(vec![button("◀️ Back to shop", CallbackAction::ShopPage(1))]);
    InlineKeyboardMarkup::new(rows)
}

pub fn categories(categories: &[Category], is_admin: bool) -> InlineKeyboardMarkup {
    let rows = categories
        .iter()
        .map(|c| {
            let mut row = vec![button(c.name.clone(), CallbackAction::Category(c.id.clone()))];
            if is_admin {
                row.push(button("✏️", CallbackAction::RenameCategory(c.id.clone())));
                row.push(button("🗑", CallbackAction::DeleteCategory(c.id.clone())));
            }
            row
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

pub fn cart(cart: &Cart) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = cart
        .items()
        .iter()
        .map(|item| {
            let id = &item.medicine.id;
            vec![
                button("➖", CallbackAction::CartDecrement(id.clone())),
                button(
                    format!("{} ({})", truncate(&item.medicine.name, 20), item.quantity),
                    CallbackAction::Medicine(id.clone()),
                ),
                button("➕", CallbackAction::CartIncrement(id.clone())),
                button("✖️", CallbackAction::CartRemove(id.clone())),
            ]
        })
        .collect();
    if !cart.is_empty() {
        rows.push(vec![button("✅ Checkout", CallbackAction::Checkout)]);
    }
    InlineKeyboardMarkup::new(rows)
}

pub fn confirm_order() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("✅ Place order", CallbackAction::ConfirmOrder),
        button("✖️ Cancel", CallbackAction::AbortCheckout),
    ]])
}

/// Customers get a cancel button on placed orders; staff get one button per
/// status the order can be moved to.
pub fn orders(page: &Page<'_, Order>, role: Role) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    for order in page.items {
        let targets = order.status.targets_for(role);
        if targets.is_empty() {
            continue;
        }
        let id = short_id(&order.id);
        if role == Role::Customer {
            rows.push(vec![button(
                format!("❌ Cancel #{}", id),
                CallbackAction::CancelOrder(order.id.clone()),
            )]);
            continue;
        }
        let mut row = vec![button(format!("#{}", id), CallbackAction::OrdersPage(page.number))];
        row.extend(targets.into_iter().map(|status| {
            button(
                format!("{} {}", status.emoji(), status),
                CallbackAction::SetStatus {
                    order_id: order.id.clone(),
                    status,
                },
            )
        }));
        rows.push(row);
    }
    let nav = pager(page, CallbackAction::OrdersPage);
    if !nav.is_empty() {
        rows.push(nav);
    }
    InlineKeyboardMarkup::new(rows)
}

pub fn inventory(page: &Page<'_, Medicine>) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, m)| {
            vec![
                button(
                    format!("✏️ {}. {}", i + 1, truncate(&m.name, 24)),
                    CallbackAction::EditMedicine(m.id.clone()),
                ),
                button("🗑", CallbackAction::DeleteMedicine(m.id.clone())),
            ]
        })
        .collect();
    let nav = pager(page, CallbackAction::InventoryPage);
    if !nav.is_empty() {
        rows.push(nav);
    }
    InlineKeyboardMarkup::new(rows)
}

/// Ban/unban and delete buttons for every user except `me`.
pub fn users(page: &Page<'_, User>, me: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = page
        .items
        .iter()
        .enumerate()
        .filter(|(_, user)| user.id != me)
        .map(|(i, user)| {
            let toggle = match user.status {
                UserStatus::Active => format!("⛔ Ban {}", i + 1),
                UserStatus::Banned => format!("🟢 Unban {}", i + 1),
            };
            vec![
                button(toggle, CallbackAction::ToggleUser(user.id.clone())),
                button(format!("🗑 Delete {}", i + 1), CallbackAction::DeleteUser(user.id.clone())),
            ]
        })
        .collect();
    let nav = pager(page, CallbackAction::UsersPage);
    if !nav.is_empty() {
        rows.push(nav);
    }
    InlineKeyboardMarkup::new(rows)
}
