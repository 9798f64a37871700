//! Table board
//!
//! Keeps table occupancy in step with the order lifecycle. Opening and
//! closing an order are two backend calls each; when the second one fails
//! the caller gets [`ClientError::TableSyncFailed`] and nothing is rolled
//! back.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use shared::OrderStatus;
use shared::models::{DiningTable, DiningTableUpdate, Order, OrderCreate};

use crate::api::{OrderApi, TableApi};
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::poller::{PollHandle, Poller};

/// Intake shown for a free table
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderIntake {
    table: DiningTable,
    guests: u32,
}

impl NewOrderIntake {
    pub fn new(table: DiningTable) -> Self {
        Self { table, guests: 1 }
    }

    pub fn table(&self) -> &DiningTable {
        &self.table
    }

    pub fn guests(&self) -> u32 {
        self.guests
    }

    fn max_guests(&self) -> u32 {
        u32::try_from(self.table.capacity).unwrap_or(0).max(1)
    }

    /// Guest count must lie within `1..=capacity`
    pub fn set_guests(&mut self, guests: i64) -> ClientResult<()> {
        let max = self.max_guests();
        match u32::try_from(guests) {
            Ok(n) if (1..=max).contains(&n) => {
                self.guests = n;
                Ok(())
            }
            _ => Err(ClientError::Validation(format!(
                "Guest count must be between 1 and {}",
                max
            ))),
        }
    }
}

/// Result of selecting a table on the board
#[derive(Debug, Clone, PartialEq)]
pub enum TableSelection {
    Occupied { table: DiningTable, order: Order },
    Vacant(NewOrderIntake),
}

#[derive(Clone)]
pub struct TableBoard<H: HttpClient> {
    tables: TableApi<H>,
    orders: OrderApi<H>,
    state: Arc<RwLock<Vec<DiningTable>>>,
}

impl<H: HttpClient> TableBoard<H> {
    pub fn new(tables: TableApi<H>, orders: OrderApi<H>) -> Self {
        Self {
            tables,
            orders,
            state: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<DiningTable>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<DiningTable>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Re-fetch the table list. On failure the previous list is kept.
    pub async fn refresh(&self) -> ClientResult<()> {
        match self.tables.list().await {
            Ok(tables) => {
                tracing::debug!(count = tables.len(), "Table board refreshed");
                *self.write() = tables;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch tables");
                Err(e)
            }
        }
    }

    async fn repoll(&self) {
        if let Err(e) = self.refresh().await {
            tracing::debug!(error = %e, "Keeping previous table list");
        }
    }

    pub fn tables(&self) -> Vec<DiningTable> {
        self.read().clone()
    }

    pub fn table(&self, table_id: i64) -> Option<DiningTable> {
        self.read().iter().find(|t| t.id == table_id).cloned()
    }

    /// Select a table from the current list. An occupied table loads its
    /// current order; a free one starts a new-order intake.
    pub async fn select(&self, table_id: i64) -> ClientResult<TableSelection> {
        let table = self
            .table(table_id)
            .ok_or_else(|| ClientError::NotFound(format!("Table {} not found", table_id)))?;

        match table.current_order_id {
            Some(order_id) => {
                let order = self.orders.get(order_id).await?;
                Ok(TableSelection::Occupied { table, order })
            }
            None => Ok(TableSelection::Vacant(NewOrderIntake::new(table))),
        }
    }

    /// Create an empty pending order for `table` and mark the table occupied.
    /// The table list is re-fetched whatever the outcome.
    pub async fn open_order(&self, table: &DiningTable) -> ClientResult<Order> {
        let result = self.open_order_inner(table).await;
        self.repoll().await;
        result
    }

    async fn open_order_inner(&self, table: &DiningTable) -> ClientResult<Order> {
        let order = self.orders.create(&OrderCreate::empty(table.id)).await?;

        self.tables
            .update(table.id, &DiningTableUpdate::occupy(order.id))
            .await
            .map_err(|e| sync_failed(table, order.id, e))?;

        tracing::info!(table_id = table.id, order_id = order.id, "Table opened");
        Ok(order)
    }

    /// Deliver `order` and free `table`. Retrying after a failed table
    /// update only releases the table.
    /// The table list is re-fetched whatever the outcome.
    pub async fn close_order(&self, table: &DiningTable, order: &Order) -> ClientResult<Order> {
        let result = self.close_order_inner(table, order).await;
        self.repoll().await;
        result
    }

    async fn close_order_inner(&self, table: &DiningTable, order: &Order) -> ClientResult<Order> {
        // A delivered order still linked to its table is a half-finished
        // close; only the table release is left to do.
        let delivered = if order.status == OrderStatus::Delivered {
            tracing::debug!(order_id = order.id, "Order already delivered");
            order.clone()
        } else {
            order.status.transition(OrderStatus::Delivered)?;
            self.orders
                .update_status(order.id, OrderStatus::Delivered)
                .await?
        };

        self.tables
            .update(table.id, &DiningTableUpdate::release())
            .await
            .map_err(|e| sync_failed(table, order.id, e))?;

        tracing::info!(table_id = table.id, order_id = order.id, "Table closed");
        Ok(delivered)
    }

    /// Refresh now and then every `interval` until the handle is dropped
    pub fn start_polling(&self, interval: Duration) -> PollHandle {
        let board = self.clone();
        Poller::spawn("tables", interval, move || {
            let board = board.clone();
            async move { board.repoll().await }
        })
    }
}

fn sync_failed(table: &DiningTable, order_id: i64, source: ClientError) -> ClientError {
    tracing::error!(
        table_id = table.id,
        order_id,
        error = %source,
        "Order saved but table update failed; table and order are out of sync"
    );
    ClientError::TableSyncFailed {
        order_id,
        source: Box::new(source),
    }
}
