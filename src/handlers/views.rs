//! HTML bodies of the bot's pages. Pure functions of the data they show.

use teloxide::utils::html;

use crate::forms::ShippingDetails;
use crate::models::{Category, Medicine, Order, Review, Role, User, UserStatus};
use crate::store::{Cart, Page};
use crate::utils::{format_date, format_price, short_id, truncate};

pub fn welcome(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            "👋 Welcome back, <b>{}</b>!\nYou are signed in as a {}.",
            html::escape(&user.name),
            user.role
        ),
        None => "💊 <b>Welcome to MediStore!</b>\n\nBrowse medicines with /shop, or /login and \
                 /register to place orders."
            .to_string(),
    }
}

pub fn help(role: Option<Role>) -> String {
    let mut lines = vec![
        "<b>MediStore Help</b>",
        "",
        "/shop [search] - Browse medicines",
        "/categories - Browse by category",
        "/cart - Show your cart",
        "/menu - Show the main menu",
    ];
    match role {
        None => lines.extend(["/login - Sign in", "/register - Create an account"]),
        Some(role) => {
            lines.extend([
                "/profile - Show your profile",
                "/editprofile - Edit your profile",
                "/logout - Sign out",
            ]);
            match role {
                Role::Customer => lines.extend(["/checkout - Place an order", "/orders - Your orders"]),
                Role::Seller => lines.extend([
                    "/inventory - Your medicines",
                    "/addmedicine - List a new medicine",
                    "/sales - Orders for your medicines",
                ]),
                Role::Admin => lines.extend([
                    "/users - Manage users",
                    "/allorders - Manage all orders",
                    "/addcategory - Create a category",
                ]),
            }
        }
    }
    lines.extend(["", "/cancel - Abandon the current form"]);
    lines.join("\n")
}

fn medicine_line(medicine: &Medicine) -> String {
    let stock = if medicine.in_stock() {
        format!("{} in stock", medicine.stock)
    } else {
        "out of stock".to_string()
    };
    format!(
        "💊 <b>{}</b> · {} · {}",
        html::escape(&medicine.name),
        format_price(medicine.price),
        stock
    )
}

pub fn shop_page(page: &Page<'_, Medicine>, heading: &str) -> String {
    if page.total_items == 0 {
        return format!("<b>{}</b>\n\nNo medicines found.", html::escape(heading));
    }
    let lines: Vec<String> = page.items.iter().map(medicine_line).collect();
    format!(
        "<b>{}</b> ({} found)\n\n{}\n\nPage {}/{}",
        html::escape(heading),
        page.total_items,
        lines.join("\n"),
        page.number,
        page.total_pages
    )
}

pub fn medicine_detail(medicine: &Medicine, reviews: &[Review]) -> String {
    let mut text = format!(
        "💊 <b>{}</b>\n\n<b>Price:</b> {}\n<b>Stock:</b> {}",
        html::escape(&medicine.name),
        format_price(medicine.price),
        if medicine.in_stock() {
            medicine.stock.to_string()
        } else {
            "out of stock".to_string()
        }
    );
    if let Some(manufacturer) = &medicine.manufacturer {
        text.push_str(&format!("\n<b>Manufacturer:</b> {}", html::escape(manufacturer)));
    }
    if let Some(category) = medicine.category_name() {
        text.push_str(&format!("\n<b>Category:</b> {}", html::escape(category)));
    }
    if let Some(description) = &medicine.description {
        text.push_str(&format!("\n\n{}", html::escape(description)));
    }

    if reviews.is_empty() {
        text.push_str("\n\n<i>No reviews yet.</i>");
        return text;
    }
    let average =
        reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / reviews.len() as f64;
    text.push_str(&format!(
        "\n\n<b>Reviews</b> ({:.1} ⭐ from {})",
        average,
        reviews.len()
    ));
    for review in reviews.iter().take(5) {
        let author = review
            .user
            .as_ref()
            .map(|u| u.name.as_str())
            .unwrap_or("Customer");
        text.push_str(&format!(
            "\n{} <b>{}</b> on {}",
            "⭐".repeat(usize::from(review.rating)),
            html::escape(author),
            format_date(review.created_at)
        ));
        if !review.comment.is_empty() {
            text.push_str(&format!("\n<i>{}</i>", html::escape(&truncate(&review.comment, 200))));
        }
    }
    text
}

pub fn categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories yet.".to_string();
    }
    let lines: Vec<String> = categories
        .iter()
        .map(|c| match &c.description {
            Some(description) => format!(
                "• <b>{}</b> - {}",
                html::escape(&c.name),
                html::escape(description)
            ),
            None => format!("• <b>{}</b>", html::escape(&c.name)),
        })
        .collect();
    format!("<b>Categories</b>\n\n{}", lines.join("\n"))
}

pub fn cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "🛒 Your cart is empty. Find something with /shop.".to_string();
    }
    let lines: Vec<String> = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "• {} × {} = {}",
                html::escape(&item.medicine.name),
                item.quantity,
                format_price(item.subtotal())
            )
        })
        .collect();
    format!(
        "🛒 <b>Your cart</b> ({} items)\n\n{}\n\n<b>Total:</b> {}",
        cart.total_items(),
        lines.join("\n"),
        format_price(cart.total_price())
    )
}

pub fn checkout_summary(cart: &Cart, shipping: &ShippingDetails) -> String {
    format!(
        "{}\n\n<b>Ship to:</b> {}\n{}\n📞 {}\n<b>Payment:</b> Cash on delivery\n\nPlace this order?",
        self::cart(cart),
        html::escape(&shipping.name),
        html::escape(&shipping.address),
        html::escape(&shipping.phone)
    )
}

pub fn order_placed(order: &Order) -> String {
    format!(
        "✅ <b>Order #{} placed!</b>\n\n<b>Total:</b> {}\n<b>Payment:</b> {}\n\nTrack it with /orders.",
        short_id(&order.id),
        format_price(order.total_amount),
        order.payment_method
    )
}

pub fn order_card(order: &Order, role: Role) -> String {
    let items: Vec<String> = order
        .items
        .iter()
        .map(|item| {
            format!(
                "  • {} × {} = {}",
                html::escape(item.display_name()),
                item.quantity,
                format_price(item.subtotal())
            )
        })
        .collect();
    let amount = match (role, order.seller_payout) {
        (Role::Seller, Some(payout)) => format!("<b>Your share:</b> {}", format_price(payout)),
        _ => format!("<b>Total:</b> {}", format_price(order.total_amount)),
    };
    let mut card = format!(
        "{} <b>#{}</b> · {} · {}\n{}\n{}",
        order.status.emoji(),
        short_id(&order.id),
        order.status,
        format_date(order.created_at),
        items.join("\n"),
        amount
    );
    if role != Role::Customer {
        card.push_str(&format!(
            "\n<b>Ship to:</b> {}, {} ({})",
            html::escape(&order.shipping_name),
            html::escape(&order.shipping_address),
            html::escape(&order.shipping_phone)
        ));
    }
    card
}

pub fn orders_page(page: &Page<'_, Order>, role: Role) -> String {
    let title = match role {
        Role::Customer => "📦 Your orders",
        Role::Seller => "📦 Orders for your medicines",
        Role::Admin => "📦 All orders",
    };
    if page.total_items == 0 {
        return format!("<b>{}</b>\n\nNo orders yet.", title);
    }
    let cards: Vec<String> = page.items.iter().map(|o| order_card(o, role)).collect();
    format!(
        "<b>{}</b>\n\n{}\n\nPage {}/{}",
        title,
        cards.join("\n\n"),
        page.number,
        page.total_pages
    )
}

pub fn inventory_page(page: &Page<'_, Medicine>) -> String {
    if page.total_items == 0 {
        return "<b>Your inventory</b>\n\nNothing listed yet. Add a medicine with /addmedicine."
            .to_string();
    }
    let lines: Vec<String> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{}. {}", i + 1, medicine_line(m)))
        .collect();
    format!(
        "<b>Your inventory</b> ({} medicines)\n\n{}\n\nPage {}/{}",
        page.total_items,
        lines.join("\n"),
        page.number,
        page.total_pages
    )
}

pub fn users_page(page: &Page<'_, User>) -> String {
    if page.total_items == 0 {
        return "<b>Users</b>\n\nNo users found.".to_string();
    }
    let lines: Vec<String> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let badge = match user.status {
                UserStatus::Active => "🟢",
                UserStatus::Banned => "⛔",
            };
            format!(
                "{}. {} <b>{}</b> ({}) · {}",
                i + 1,
                badge,
                html::escape(&user.name),
                html::escape(&user.email),
                user.role
            )
        })
        .collect();
    format!(
        "<b>Users</b> ({})\n\n{}\n\nPage {}/{}",
        page.total_items,
        lines.join("\n"),
        page.number,
        page.total_pages
    )
}

pub fn profile(user: &User) -> String {
    let or_unset = |value: &Option<String>| {
        value
            .as_deref()
            .map(html::escape)
            .unwrap_or_else(|| "<i>not set</i>".to_string())
    };
    format!(
        "👤 <b>{}</b>\n\n<b>Email:</b> {}\n<b>Role:</b> {}\n<b>Phone:</b> {}\n<b>Address:</b> {}\n\nChange it with /editprofile.",
        html::escape(&user.name),
        html::escape(&user.email),
        user.role,
        or_unset(&user.phone),
        or_unset(&user.address)
    )
}
