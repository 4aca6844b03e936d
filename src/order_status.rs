//! Order lifecycle as seen by the client.
//!
//! `placed → processing → shipped → delivered`, or `placed → cancelled`.
//! Customers may only cancel a placed order. Sellers and admins may move an
//! order to any other status; whether leaving `delivered` or `cancelled` is
//! allowed is decided by the server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[serde(alias = "PLACED")]
    Placed,
    #[serde(alias = "PROCESSING")]
    Processing,
    #[serde(alias = "SHIPPED")]
    Shipped,
    #[serde(alias = "DELIVERED")]
    Delivered,
    #[serde(alias = "CANCELLED")]
    Cancelled,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Only placed orders can be cancelled (this one is {0}).")]
    NotCancellable(OrderStatus),
    #[error("Customers can only cancel orders.")]
    CustomerMayOnlyCancel,
    #[error("The order is already {0}.")]
    Unchanged(OrderStatus),
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "🆕",
            OrderStatus::Processing => "⚙️",
            OrderStatus::Shipped => "🚚",
            OrderStatus::Delivered => "✅",
            OrderStatus::Cancelled => "❌",
        }
    }

    /// The cancel button is offered iff this returns true.
    pub fn is_cancellable_by_customer(&self) -> bool {
        matches!(self, OrderStatus::Placed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Statuses offered to `role` for an order currently in `self`.
    pub fn targets_for(&self, role: Role) -> Vec<OrderStatus> {
        match role {
            Role::Customer if self.is_cancellable_by_customer() => vec![OrderStatus::Cancelled],
            Role::Customer => Vec::new(),
            Role::Seller | Role::Admin => Self::ALL
                .into_iter()
                .filter(|status| status != self)
                .collect(),
        }
    }

    /// Checks a transition requested by `role` before it is sent to the server.
    pub fn transition(self, to: OrderStatus, role: Role) -> Result<OrderStatus, TransitionError> {
        if self == to {
            return Err(TransitionError::Unchanged(self));
        }
        match role {
            Role::Customer if to != OrderStatus::Cancelled => {
                Err(TransitionError::CustomerMayOnlyCancel)
            }
            Role::Customer if !self.is_cancellable_by_customer() => {
                Err(TransitionError::NotCancellable(self))
            }
            _ => {
                if self.is_terminal() {
                    log::warn!("Moving order out of terminal status {} to {}", self, to);
                }
                Ok(to)
            }
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "placed" => Ok(OrderStatus::Placed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err("Unknown order status"),
        }
    }
}
