//! Kitchen status board
//!
//! Holds the active-order working set, buckets it by status and drives the
//! kitchen's forward transitions. State is shared between clones so a
//! polling task and the caller see the same board.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use shared::models::Order;
use shared::{KitchenAction, OrderStatus};

use crate::api::OrderApi;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::poller::{PollHandle, Poller};

/// Status filter shown by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KitchenTab {
    #[default]
    Pending,
    Preparing,
    Ready,
}

impl KitchenTab {
    pub const ALL: [KitchenTab; 3] = [
        KitchenTab::Pending,
        KitchenTab::Preparing,
        KitchenTab::Ready,
    ];

    pub fn status(&self) -> OrderStatus {
        match self {
            KitchenTab::Pending => OrderStatus::Pending,
            KitchenTab::Preparing => OrderStatus::Preparing,
            KitchenTab::Ready => OrderStatus::Ready,
        }
    }

    pub fn for_status(status: OrderStatus) -> Option<Self> {
        match status {
            OrderStatus::Pending => Some(KitchenTab::Pending),
            OrderStatus::Preparing => Some(KitchenTab::Preparing),
            OrderStatus::Ready => Some(KitchenTab::Ready),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }
}

impl std::fmt::Display for KitchenTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status().as_str())
    }
}

impl std::str::FromStr for KitchenTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<OrderStatus>()
            .ok()
            .and_then(KitchenTab::for_status)
            .ok_or_else(|| format!("unknown kitchen tab: {s}"))
    }
}

/// Bucket sizes per tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KitchenCounts {
    pub pending: usize,
    pub preparing: usize,
    pub ready: usize,
}

impl KitchenCounts {
    pub fn get(&self, tab: KitchenTab) -> usize {
        match tab {
            KitchenTab::Pending => self.pending,
            KitchenTab::Preparing => self.preparing,
            KitchenTab::Ready => self.ready,
        }
    }
}

#[derive(Debug, Default)]
struct KitchenState {
    orders: Vec<Order>,
    tab: KitchenTab,
}

#[derive(Clone)]
pub struct KitchenBoard<H: HttpClient> {
    orders: OrderApi<H>,
    state: Arc<RwLock<KitchenState>>,
}

impl<H: HttpClient> KitchenBoard<H> {
    pub fn new(orders: OrderApi<H>) -> Self {
        Self {
            orders,
            state: Arc::new(RwLock::new(KitchenState::default())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, KitchenState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, KitchenState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Re-fetch the active orders. On failure the previous set is kept.
    pub async fn refresh(&self) -> ClientResult<()> {
        match self.orders.active().await {
            Ok(orders) => {
                tracing::debug!(count = orders.len(), "Kitchen board refreshed");
                self.write().orders = orders;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch active orders");
                Err(e)
            }
        }
    }

    async fn repoll(&self) {
        if let Err(e) = self.refresh().await {
            tracing::debug!(error = %e, "Keeping previous active orders");
        }
    }

    pub fn select_tab(&self, tab: KitchenTab) {
        self.write().tab = tab;
    }

    pub fn tab(&self) -> KitchenTab {
        self.read().tab
    }

    /// Full working set
    pub fn orders(&self) -> Vec<Order> {
        self.read().orders.clone()
    }

    /// Orders matching the selected tab
    pub fn visible_orders(&self) -> Vec<Order> {
        let state = self.read();
        let status = state.tab.status();
        state
            .orders
            .iter()
            .filter(|o| o.status == status)
            .cloned()
            .collect()
    }

    pub fn counts(&self) -> KitchenCounts {
        let mut counts = KitchenCounts::default();
        for order in &self.read().orders {
            match KitchenTab::for_status(order.status) {
                Some(KitchenTab::Pending) => counts.pending += 1,
                Some(KitchenTab::Preparing) => counts.preparing += 1,
                Some(KitchenTab::Ready) => counts.ready += 1,
                None => {}
            }
        }
        counts
    }

    /// Action offered for `order`, if any
    pub fn actions_for(&self, order: &Order) -> Option<KitchenAction> {
        KitchenAction::for_status(order.status)
    }

    /// Move an order on the board to `target`.
    ///
    /// Only the kitchen action for the order's current status is accepted.
    /// On success the whole active set is re-fetched; the cached copy is
    /// never patched.
    pub async fn advance(&self, order_id: i64, target: OrderStatus) -> ClientResult<Order> {
        let current = self
            .read()
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .map(|o| o.status)
            .ok_or_else(|| {
                ClientError::NotFound(format!("Order {} is not on the kitchen board", order_id))
            })?;

        let action = KitchenAction::for_status(current)
            .filter(|a| a.target_status() == target)
            .ok_or(ClientError::InvalidTransition {
                from: current,
                to: target,
            })?;

        let updated = match self.orders.update_status(order_id, target).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(
                    order_id,
                    from = %current,
                    to = %target,
                    error = %e,
                    "Status change failed"
                );
                return Err(e);
            }
        };
        tracing::info!(
            order_id,
            action = action.label(),
            status = %updated.status,
            "Order advanced"
        );

        self.repoll().await;
        Ok(updated)
    }

    /// Refresh now and then every `interval` until the handle is dropped
    pub fn start_polling(&self, interval: Duration) -> PollHandle {
        let board = self.clone();
        Poller::spawn("kitchen", interval, move || {
            let board = board.clone();
            async move { board.repoll().await }
        })
    }
}
