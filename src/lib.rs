//! MediStore storefront client: a Telegram bot over the MediStore REST API.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod order_status;
pub mod services;
pub mod store;
pub mod utils;
pub mod validation;
