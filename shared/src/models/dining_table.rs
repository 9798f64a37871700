//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: i64,
    pub number: i32,
    pub capacity: i32,
    #[serde(default)]
    pub is_occupied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<i64>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i32,
    pub capacity: i32,
    #[serde(default)]
    pub is_occupied: bool,
}

/// Update dining table payload
///
/// `current_order_id` is tri-state: `None` leaves it untouched, `Some(None)`
/// sends `null` to clear it, `Some(Some(id))` links an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiningTableUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_occupied: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_some"
    )]
    pub current_order_id: Option<Option<i64>>,
}

impl DiningTableUpdate {
    /// Mark occupied and link `order_id`
    pub fn occupy(order_id: i64) -> Self {
        Self {
            is_occupied: Some(true),
            current_order_id: Some(Some(order_id)),
            ..Default::default()
        }
    }

    /// Mark free and clear the order link
    pub fn release() -> Self {
        Self {
            is_occupied: Some(false),
            current_order_id: Some(None),
            ..Default::default()
        }
    }
}

// An explicit `null` must survive as `Some(None)` instead of collapsing to `None`.
fn deserialize_some<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}
