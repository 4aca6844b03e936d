use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use super::keyboards::{MenuAction, MENU};
use super::state::{MyDialogue, State};
use super::{account, admin, cart, inventory, order, shop, HandlerResult};
use crate::app::AppContext;
use crate::models::{MedicineQuery, Role};

#[derive(BotCommands, Debug, Clone, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start using MediStore.")]
    Start,
    #[command(description = "Show the commands available to you.")]
    Help,
    #[command(description = "Show the main menu.")]
    Menu,
    #[command(description = "Browse medicines, optionally searching by name.")]
    Shop(String),
    #[command(description = "Browse medicines by category.")]
    Categories,
    #[command(description = "Show your cart.")]
    Cart,
    #[command(description = "Check out the cart.")]
    Checkout,
    #[command(description = "Create an account.")]
    Register,
    #[command(description = "Sign in.")]
    Login,
    #[command(description = "Sign out.")]
    Logout,
    #[command(description = "Show your profile.")]
    Profile,
    #[command(description = "Edit your profile.")]
    EditProfile,
    #[command(description = "Show your orders.")]
    Orders,
    #[command(description = "Seller: show your medicines.")]
    Inventory,
    #[command(description = "Seller: list a new medicine.")]
    AddMedicine,
    #[command(description = "Seller: orders for your medicines.")]
    Sales,
    #[command(description = "Admin: manage users.")]
    Users,
    #[command(description = "Admin: manage all orders.")]
    AllOrders,
    #[command(description = "Admin: create a category.")]
    AddCategory,
    #[command(description = "Abandon the current form.")]
    Cancel,
}

/// Handles bot commands.
///
/// Any command ends the wizard the chat was in, except the ones that start
/// a new one.
pub async fn answer(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: AppContext,
    dialogue: MyDialogue,
) -> HandlerResult {
    log::info!("Received {:?} from chat {}", cmd, msg.chat.id);
    dialogue.update(State::Idle).await?;

    match cmd {
        Command::Start => account::start(&bot, &ctx, &dialogue).await,
        Command::Help => account::help(&bot, &ctx, &dialogue).await,
        Command::Menu => account::menu(&bot, &ctx, &dialogue).await,
        Command::Shop(search) => {
            let search = search.trim();
            let query = MedicineQuery {
                search: (!search.is_empty()).then(|| search.to_string()),
                category_id: None,
            };
            let heading = match &query.search {
                Some(search) => format!("Results for \"{}\"", search),
                None => "All medicines".to_string(),
            };
            shop::browse(&bot, &ctx, &dialogue, query, &heading).await
        }
        Command::Categories => shop::categories(&bot, &ctx, &dialogue).await,
        Command::Cart => cart::show(&bot, &ctx, &dialogue).await,
        Command::Checkout => cart::begin_checkout(&bot, &ctx, &dialogue).await,
        Command::Register => account::begin_registration(&bot, &ctx, &dialogue).await,
        Command::Login => account::begin_login(&bot, &ctx, &dialogue).await,
        Command::Logout => account::logout(&bot, &ctx, &dialogue).await,
        Command::Profile => account::profile(&bot, &ctx, &dialogue).await,
        Command::EditProfile => account::begin_profile_edit(&bot, &ctx, &dialogue).await,
        Command::Orders => order::list(&bot, &ctx, &dialogue, Some(Role::Customer)).await,
        Command::Inventory => inventory::list(&bot, &ctx, &dialogue).await,
        Command::AddMedicine => inventory::begin_editor(&bot, &ctx, &dialogue, None).await,
        Command::Sales => order::list(&bot, &ctx, &dialogue, Some(Role::Seller)).await,
        Command::Users => admin::list_users(&bot, &ctx, &dialogue).await,
        Command::AllOrders => order::list(&bot, &ctx, &dialogue, Some(Role::Admin)).await,
        Command::AddCategory => admin::begin_category_editor(&bot, &ctx, &dialogue, None).await,
        Command::Cancel => {
            bot.send_message(msg.chat.id, "Cancelled.").await?;
            Ok(())
        }
    }
}

/// Handles plain text outside of any wizard: reply-menu labels or a hint.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    ctx: AppContext,
    dialogue: MyDialogue,
) -> HandlerResult {
    let Some(action) = msg.text().and_then(|text| MENU.get(text)) else {
        bot.send_message(
            msg.chat.id,
            "I don't understand that. Please use the menu or type /help for available commands.",
        )
        .await?;
        return Ok(());
    };

    match action {
        MenuAction::Shop => {
            shop::browse(&bot, &ctx, &dialogue, MedicineQuery::default(), "All medicines").await
        }
        MenuAction::Categories => shop::categories(&bot, &ctx, &dialogue).await,
        MenuAction::Cart => cart::show(&bot, &ctx, &dialogue).await,
        MenuAction::Orders => order::list(&bot, &ctx, &dialogue, Some(Role::Customer)).await,
        MenuAction::Profile => account::profile(&bot, &ctx, &dialogue).await,
        MenuAction::Inventory => inventory::list(&bot, &ctx, &dialogue).await,
        MenuAction::AddMedicine => inventory::begin_editor(&bot, &ctx, &dialogue, None).await,
        MenuAction::Sales => order::list(&bot, &ctx, &dialogue, Some(Role::Seller)).await,
        MenuAction::Users => admin::list_users(&bot, &ctx, &dialogue).await,
        MenuAction::AllOrders => order::list(&bot, &ctx, &dialogue, Some(Role::Admin)).await,
        MenuAction::Login => account::begin_login(&bot, &ctx, &dialogue).await,
        MenuAction::Register => account::begin_registration(&bot, &ctx, &dialogue).await,
        MenuAction::Logout => account::logout(&bot, &ctx, &dialogue).await,
        MenuAction::Help => account::help(&bot, &ctx, &dialogue).await,
    }
}
