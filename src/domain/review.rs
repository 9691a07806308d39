use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{null_as_default, Ref};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    Subscription,
    Vendor,
    Order,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Active,
    Hidden,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub review_type: ReviewType,
    #[serde(deserialize_with = "null_as_default")]
    pub rating: u8,
    pub review_text: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: ReviewStatus,
    pub user_id: Option<Ref>,
    pub subscription_id: Option<Ref>,
    pub vendor_id: Option<Ref>,
    pub order_id: Option<Ref>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Review {
    /// The entity the review is about, according to its type.
    pub fn subject(&self) -> Option<&Ref> {
        match self.review_type {
            ReviewType::Subscription => self.subscription_id.as_ref(),
            ReviewType::Vendor => self.vendor_id.as_ref(),
            ReviewType::Order => self.order_id.as_ref(),
            ReviewType::Unknown => None,
        }
    }
}
