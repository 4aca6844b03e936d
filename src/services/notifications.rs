use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use futures::future;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::app::AppContext;
use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderStatus, Role, User};
use crate::services::orders;
use crate::store::auth::TOKEN_KEY;
use crate::utils::{format_price, short_id};

/// Something a signed-in chat should hear about between two polls.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    /// One of the customer's orders moved to another status.
    StatusChanged { order: Order, from: OrderStatus },
    /// A seller received an order containing their medicines.
    Received(Order),
}

impl OrderEvent {
    pub fn message(&self) -> String {
        match self {
            OrderEvent::StatusChanged { order, from } => format!(
                "{} <b>Order #{} updated</b>\n\n{} → <b>{}</b>",
                order.status.emoji(),
                short_id(&order.id),
                from,
                order.status
            ),
            OrderEvent::Received(order) => format!(
                "🛒 <b>New order #{}</b>\n\n<b>Ship to:</b> {}\n<b>Items:</b> {}\n<b>Total:</b> {}",
                short_id(&order.id),
                html::escape(&order.shipping_name),
                order.items.len(),
                format_price(order.seller_payout.unwrap_or(order.total_amount))
            ),
        }
    }
}

/// Order statuses a chat saw on its last poll, and whose account they were.
#[derive(Clone, Debug)]
struct Snapshot {
    user_id: String,
    role: Role,
    statuses: HashMap<String, OrderStatus>,
}

/// Order statuses last seen by each chat.
#[derive(Clone, Debug, Default)]
pub struct StatusWatch {
    seen: Arc<DashMap<ChatId, Snapshot>>,
}

impl StatusWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `orders` as the latest state of `chat` and returns what changed
    /// since the previous call.
    ///
    /// # Arguments
    ///
    /// * `user` - The account the orders were fetched for
    /// * `orders` - The orders visible to that account right now
    ///
    /// # Returns
    ///
    /// The events since the last poll. The first poll of an account on a
    /// chat only sets the baseline, so signing in as somebody else on the
    /// same chat starts over instead of comparing against the old account.
    pub fn observe(&self, chat: ChatId, user: &User, orders: &[Order]) -> Vec<OrderEvent> {
        let current = Snapshot {
            user_id: user.id.clone(),
            role: user.role,
            statuses: orders
                .iter()
                .map(|order| (order.id.clone(), order.status))
                .collect(),
        };
        match self.seen.insert(chat, current) {
            Some(previous) if previous.user_id == user.id && previous.role == user.role => {
                diff(&previous.statuses, user.role, orders)
            }
            Some(_) => {
                log::debug!("Chat {} switched accounts, taking a new baseline", chat);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    pub fn forget(&self, chat: ChatId) {
        self.seen.remove(&chat);
    }

    /// Drops the snapshots of chats that are no longer signed in.
    pub fn retain_chats(&self, signed_in: &[ChatId]) {
        self.seen.retain(|chat, _| signed_in.contains(chat));
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Events for `role` between the `previous` statuses and the current `orders`.
pub fn diff(previous: &HashMap<String, OrderStatus>, role: Role, orders: &[Order]) -> Vec<OrderEvent> {
    match role {
        Role::Customer => orders
            .iter()
            .filter_map(|order| {
                let from = *previous.get(&order.id)?;
                (from != order.status).then(|| OrderEvent::StatusChanged {
                    order: order.clone(),
                    from,
                })
            })
            .collect(),
        Role::Seller => orders
            .iter()
            .filter(|order| !previous.contains_key(&order.id))
            .map(|order| OrderEvent::Received(order.clone()))
            .collect(),
        Role::Admin => Vec::new(),
    }
}

/// Schedules the order poll on `cron`.
pub async fn schedule_order_notifications(
    ctx: AppContext,
    bot: Bot,
    cron: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let sched = JobScheduler::new().await?;
    let watch = StatusWatch::new();

    let job = Job::new_async(cron, move |_uuid, _l| {
        let ctx = ctx.clone();
        let bot = bot.clone();
        let watch = watch.clone();
        Box::pin(async move {
            match check_and_notify(&ctx, &bot, &watch).await {
                Ok(sent) => log::debug!("Order poll completed, {} notification(s) sent", sent),
                Err(e) => log::error!("Error polling orders: {}", e),
            }
        })
    })
    .map_err(|e| {
        log::error!("Failed to create job: {}", e);
        e
    })?;

    sched.add(job).await.map_err(|e| {
        log::error!("Failed to add job to scheduler: {}", e);
        e
    })?;

    tokio::spawn(async move {
        if let Err(e) = sched.start().await {
            log::error!("Scheduler error: {}", e);
        }
    });

    log::info!("Order notifications scheduled ({})", cron);
    Ok(())
}

/// Polls every signed-in chat once and sends what changed. Returns the
/// number of notifications delivered.
pub async fn check_and_notify(ctx: &AppContext, bot: &Bot, watch: &StatusWatch) -> AppResult<usize> {
    let chats = ctx.auth.storage().chats_with_item(TOKEN_KEY).await?;
    watch.retain_chats(&chats);
    log::debug!("Polling {} chat(s), {} with a baseline", chats.len(), watch.len());

    let polls: Vec<_> = chats
        .iter()
        .map(|&chat| poll_chat(ctx, watch, chat))
        .collect();
    let results = future::join_all(polls).await;

    let mut deliveries = Vec::new();
    for (chat, result) in chats.iter().zip(results) {
        match result {
            Ok(events) => {
                for event in events {
                    deliveries.push(send_notification(bot, *chat, event));
                }
            }
            Err(AppError::SessionExpired) | Err(AppError::NotSignedIn) => watch.forget(*chat),
            Err(e) => log::error!("Failed to poll orders for chat {}: {}", chat, e),
        }
    }

    let mut sent = 0;
    for result in future::join_all(deliveries).await {
        match result {
            Ok(()) => sent += 1,
            Err(e) => log::error!("Failed to send notification: {}", e),
        }
    }
    Ok(sent)
}

pub async fn poll_chat(ctx: &AppContext, watch: &StatusWatch, chat: ChatId) -> AppResult<Vec<OrderEvent>> {
    let session = ctx.session(chat).await?;
    if session.user.role == Role::Admin {
        return Ok(Vec::new());
    }
    let orders = orders::fetch_orders(ctx, chat, &session).await?;
    Ok(watch.observe(chat, &session.user, &orders))
}

async fn send_notification(bot: &Bot, chat: ChatId, event: OrderEvent) -> Result<(), teloxide::RequestError> {
    bot.send_message(chat, event.message())
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
