use envconfig::Envconfig;

#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    #[envconfig(from = "TELEGRAM_BOT_TOKEN")]
    pub telegram_bot_token: String,

    #[envconfig(from = "DATABASE_URL", default = "sqlite://medistore.db")]
    pub database_url: String,

    #[envconfig(from = "MEDISTORE_API_URL", default = "http://localhost:5000/api/v1")]
    pub api_url: String,

    #[envconfig(from = "MEDISTORE_API_TIMEOUT_SECS", default = "30")]
    pub api_timeout_secs: u64,

    #[envconfig(from = "MEDISTORE_PAGE_SIZE", default = "5")]
    pub page_size: usize,

    #[envconfig(from = "MEDISTORE_NOTIFY_CRON", default = "0 */2 * * * *")]
    pub notify_cron: String,
}

/// Settings for the `seed` binary.
#[derive(Envconfig, Debug, Clone)]
pub struct SeedConfig {
    #[envconfig(from = "MEDISTORE_API_URL", default = "http://localhost:5000/api/v1")]
    pub api_url: String,

    #[envconfig(from = "SEED_SELLER_EMAIL")]
    pub seller_email: String,

    #[envconfig(from = "SEED_SELLER_PASSWORD")]
    pub seller_password: String,
}
