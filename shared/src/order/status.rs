//! Order status machine
//!
//! `pending → preparing → ready → delivered`, with `cancelled` reachable from
//! any active status. Terminal statuses never change and no transition moves
//! an order backwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

/// Rejected status change
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("illegal order transition {from} -> {to}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Anything not delivered or cancelled
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Position along the forward path. Both terminal statuses share the last rank.
    pub fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Preparing => 1,
            OrderStatus::Ready => 2,
            OrderStatus::Delivered | OrderStatus::Cancelled => 3,
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Pending, OrderStatus::Preparing) => true,
            (OrderStatus::Preparing, OrderStatus::Ready) => true,
            (from, OrderStatus::Delivered | OrderStatus::Cancelled) => from.is_active(),
            _ => false,
        }
    }

    /// Checked transition
    pub fn transition(self, next: OrderStatus) -> Result<OrderStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

/// Forward steps the kitchen is allowed to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KitchenAction {
    /// pending -> preparing
    StartPreparing,
    /// preparing -> ready
    MarkReady,
}

impl KitchenAction {
    /// The single action offered for an order in `status`, if any
    pub fn for_status(status: OrderStatus) -> Option<Self> {
        match status {
            OrderStatus::Pending => Some(KitchenAction::StartPreparing),
            OrderStatus::Preparing => Some(KitchenAction::MarkReady),
            OrderStatus::Ready | OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    pub fn required_status(&self) -> OrderStatus {
        match self {
            KitchenAction::StartPreparing => OrderStatus::Pending,
            KitchenAction::MarkReady => OrderStatus::Preparing,
        }
    }

    pub fn target_status(&self) -> OrderStatus {
        match self {
            KitchenAction::StartPreparing => OrderStatus::Preparing,
            KitchenAction::MarkReady => OrderStatus::Ready,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KitchenAction::StartPreparing => "start preparing",
            KitchenAction::MarkReady => "mark ready",
        }
    }
}
