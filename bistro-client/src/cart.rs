//! Cart / order builder
//!
//! Client-local aggregation of menu selections for one table. Lines are
//! kept in insertion order, one per menu item, each with quantity >= 1.

use rust_decimal::Decimal;
use shared::OrderStatus;
use shared::models::{MenuItem, Order, OrderCreate, OrderItemCreate};
use shared::order::money;

use crate::api::OrderApi;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

/// Table the cart is being built for, taken from a scanned code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableContext(i64);

impl TableContext {
    /// Table ids are positive; anything else is rejected.
    pub fn new(table_id: i64) -> Option<Self> {
        (table_id > 0).then_some(Self(table_id))
    }

    /// Parse the `table` parameter of a scan-derived query string,
    /// e.g. `table=7` or `?lang=en&table=7`.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "table")
            .and_then(|(_, value)| value.trim().parse::<i64>().ok())
            .and_then(Self::new)
    }

    pub fn table_id(&self) -> i64 {
        self.0
    }
}

/// One menu item in the cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        money::line_total(self.item.price, self.quantity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn quantity_of(&self, menu_item_id: i64) -> Option<u32> {
        self.line(menu_item_id).map(|l| l.quantity)
    }

    fn line(&self, menu_item_id: i64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item.id == menu_item_id)
    }

    /// Add one of `item`, merging into an existing line
    pub fn add_item(&mut self, item: &MenuItem) {
        match self.lines.iter_mut().find(|l| l.item.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                item: item.clone(),
                quantity: 1,
            }),
        }
    }

    pub fn remove_item(&mut self, menu_item_id: i64) {
        self.lines.retain(|l| l.item.id != menu_item_id);
    }

    /// Set a line's quantity. Values below 1 are rejected and leave the
    /// line unchanged; an unknown item is ignored.
    pub fn set_quantity(&mut self, menu_item_id: i64, quantity: i64) -> ClientResult<()> {
        let quantity = match i32::try_from(quantity) {
            Ok(q) if q >= 1 => q.unsigned_abs(),
            _ => return Err(ClientError::InvalidQuantity(quantity)),
        };
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id == menu_item_id) {
            line.quantity = quantity;
        }
        Ok(())
    }

    pub fn increment(&mut self, menu_item_id: i64) -> ClientResult<()> {
        match self.quantity_of(menu_item_id) {
            Some(q) => self.set_quantity(menu_item_id, i64::from(q) + 1),
            None => Ok(()),
        }
    }

    /// Rejected at quantity 1; use [`Cart::remove_item`] to drop a line.
    pub fn decrement(&mut self, menu_item_id: i64) -> ClientResult<()> {
        match self.quantity_of(menu_item_id) {
            Some(q) => self.set_quantity(menu_item_id, i64::from(q) - 1),
            None => Ok(()),
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price x quantity over all lines
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total as sent on the wire
    pub fn total_f64(&self) -> f64 {
        money::to_f64(self.total())
    }

    /// Order-creation payload with prices captured from the cart lines
    pub fn build_order(&self, table: TableContext) -> OrderCreate {
        let items = self
            .lines
            .iter()
            .map(|line| OrderItemCreate {
                menu_item_id: line.item.id,
                quantity: i32::try_from(line.quantity).unwrap_or(i32::MAX),
                price: line.item.price,
            })
            .collect();

        OrderCreate {
            table_id: table.table_id(),
            items,
            status: OrderStatus::Pending,
            total_amount: self.total_f64(),
        }
    }

    /// Submit the cart as a new pending order.
    ///
    /// The cart is cleared only once the backend accepts the order.
    pub async fn submit<H: HttpClient>(
        &mut self,
        orders: &OrderApi<H>,
        table: Option<TableContext>,
    ) -> ClientResult<Order> {
        let table = table.ok_or(ClientError::MissingTableContext)?;
        if self.is_empty() {
            return Err(ClientError::EmptyCart);
        }

        let request = self.build_order(table);
        let order = match orders.create(&request).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(table_id = table.table_id(), error = %e, "Order submission failed");
                return Err(e);
            }
        };

        tracing::info!(
            order_id = order.id,
            table_id = order.table_id,
            items = request.items.len(),
            total = request.total_amount,
            "Order submitted"
        );
        self.clear();
        Ok(order)
    }
}
