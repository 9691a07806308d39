use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{null_as_default, Ref};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending,
    Active,
    Paused,
    Expired,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PurchaseStatus {
    pub const ALL: &'static [&'static str] = &["pending", "active", "paused", "expired", "cancelled"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Active => "active",
            PurchaseStatus::Paused => "paused",
            PurchaseStatus::Expired => "expired",
            PurchaseStatus::Cancelled => "cancelled",
            PurchaseStatus::Unknown => "unknown",
        }
    }
}

/// A customer's purchased subscription (a "user subscription").
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Purchase {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub user_id: Option<Ref>,
    pub subscription_id: Option<Ref>,
    pub vendor_details: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub credits_granted: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub credits_used: u32,
    pub amount_paid: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: PurchaseStatus,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Purchase {
    pub fn credits_remaining(&self) -> u32 {
        self.credits_granted.saturating_sub(self.credits_used)
    }
}
