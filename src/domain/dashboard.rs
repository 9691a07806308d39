//! Chart and tile documents for the dashboard and analytics pages.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{null_as_default, OrderStatus};

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverviewStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_users: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub active_subscriptions: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub todays_orders: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_revenue: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub pending_vendor_requests: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One point of a time series, `label` being a date or period name.
///
/// Routes disagree on key names and some rows carry several numeric columns
/// (`revenue` and `count`), so the first known key wins.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl From<Map<String, Value>> for SeriesPoint {
    fn from(row: Map<String, Value>) -> Self {
        Self {
            label: first_label(&row, &["label", "date", "period", "_id"]),
            value: first_number(&row, &["value", "revenue", "total", "count"]),
        }
    }
}

/// One slice of a breakdown chart.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct BreakdownSlice {
    pub label: String,
    pub count: u64,
}

impl From<Map<String, Value>> for BreakdownSlice {
    fn from(row: Map<String, Value>) -> Self {
        Self {
            label: first_label(&row, &["label", "name", "status", "_id"]),
            count: first_number(&row, &["count", "value", "total"]).max(0.0) as u64,
        }
    }
}

fn first_label(row: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .find_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn first_number(row: &Map<String, Value>, keys: &[&str]) -> f64 {
    keys.iter().filter_map(|k| row.get(*k)).find_map(Value::as_f64).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecentOrder {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub order_number: Option<String>,
    pub customer_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    pub delivery_date: Option<String>,
    pub total_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopPlan {
    #[serde(deserialize_with = "null_as_default")]
    pub plan_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub purchases: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorPerformance {
    #[serde(deserialize_with = "null_as_default")]
    pub vendor_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub orders_delivered: u64,
    pub average_rating: Option<f64>,
    pub on_time_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_point_takes_first_known_key() {
        let p: SeriesPoint = serde_json::from_value(json!({ "_id": "2025-01-05", "revenue": 1200.5, "count": 4 })).unwrap();
        assert_eq!(p, SeriesPoint { label: "2025-01-05".into(), value: 1200.5 });

        let p: SeriesPoint = serde_json::from_value(json!({ "period": 3, "count": 9 })).unwrap();
        assert_eq!(p, SeriesPoint { label: "3".into(), value: 9.0 });
    }

    #[test]
    fn test_breakdown_slice_shapes() {
        let s: BreakdownSlice = serde_json::from_value(json!({ "_id": "monthly", "count": 12 })).unwrap();
        assert_eq!(s, BreakdownSlice { label: "monthly".into(), count: 12 });

        let s: BreakdownSlice = serde_json::from_value(json!({ "name": "weekly", "value": 3 })).unwrap();
        assert_eq!(s.count, 3);
    }
}
