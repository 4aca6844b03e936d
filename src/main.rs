use std::time::Duration;

use dotenvy::dotenv;
use envconfig::Envconfig;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use medistore::api::ApiClient;
use medistore::app::AppContext;
use medistore::config::Config;
use medistore::db::{init_db, LocalStorage};
use medistore::handlers::{self, Command, Error, State};
use medistore::services::notifications::schedule_order_notifications;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize the logger with default settings or "info" level if not specified
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    log::info!("Starting the MediStore bot...");

    // Load environment variables from a .env file if present
    dotenv().ok();
    let config = Config::init_from_env()?;

    let pool = init_db(&config.database_url).await?;
    let api = ApiClient::new(
        &config.api_url,
        Duration::from_secs(config.api_timeout_secs),
    )?;
    log::info!("Using MediStore API at {}", api.base_url());
    let ctx = AppContext::new(api, LocalStorage::new(pool), config.page_size);

    let bot = Bot::new(config.telegram_bot_token);
    bot.set_my_commands(Command::bot_commands()).await?;

    if let Err(e) =
        schedule_order_notifications(ctx.clone(), bot.clone(), &config.notify_cron).await
    {
        log::error!("Order notifications disabled: {}", e);
    }

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![ctx, InMemStorage::<State>::new()])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Shutting down gracefully");
    Ok(())
}
