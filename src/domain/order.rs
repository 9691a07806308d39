use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{null_as_default, Ref};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Upcoming,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
    Skipped,
    #[default]
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub const ALL: &'static [&'static str] =
        &["upcoming", "preparing", "out_for_delivery", "delivered", "cancelled", "skipped"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Upcoming => "upcoming",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Skipped => "skipped",
            OrderStatus::Unknown => "unknown",
        }
    }

    /// Cancelled and skipped deliveries both count as failed on the orders page.
    pub fn is_failed(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Skipped)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusChange {
    #[serde(deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    pub timestamp: Option<String>,
    pub updated_by: Option<Ref>,
    pub notes: Option<String>,
}

/// A single delivery.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub order_number: Option<String>,
    pub user_id: Option<Ref>,
    pub vendor_details: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub selected_menus: Vec<Value>,
    pub delivery_date: Option<String>,
    pub delivery_time: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    pub total_amount: Option<f64>,
    pub skip_details: Option<Value>,
    pub cancellation_details: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub status_history: Vec<StatusChange>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
