use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{null_as_default, Ref};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[default]
    Initial,
    Switch,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
    #[serde(other)]
    Unknown,
}

impl Priority {
    pub fn is_pressing(&self) -> bool {
        matches!(self, Priority::High | Priority::Urgent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Assigned,
    Rejected,
    Completed,
    #[serde(other)]
    Unknown,
}

/// A customer's request to be given (or moved to) a vendor.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorAssignmentRequest {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub request_type: RequestType,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(deserialize_with = "null_as_default")]
    pub status: AssignmentStatus,
    pub user_id: Option<Ref>,
    pub user_subscription_id: Option<Ref>,
    pub delivery_zone: Option<Ref>,
    pub current_vendor: Option<Ref>,
    pub assigned_vendor: Option<Ref>,
    pub reason: Option<String>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
