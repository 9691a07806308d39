use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use futures_util::future::join_all;
use tracing::{info, instrument};

use crate::api::{endpoints, ApiRequest, SharedTransport};
use crate::domain::{BreakdownSlice, SeriesPoint, TopPlan, VendorPerformance};
use crate::error::ResourceError;
use crate::filters::DATE_FORMAT;
use crate::insights::{list_section, Section};

/// Reporting window for the analytics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl Period {
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, ResourceError> {
        if end < start {
            return Err(ResourceError::InvalidFilter {
                field: "endDate".to_string(),
                reason: "end date is before start date".to_string(),
            });
        }
        Ok(Period::Custom { start, end })
    }

    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            Period::Custom { start, end } => vec![
                ("startDate".to_string(), start.format(DATE_FORMAT).to_string()),
                ("endDate".to_string(), end.format(DATE_FORMAT).to_string()),
            ],
            preset => vec![("period".to_string(), preset.to_string())],
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week => f.write_str("7d"),
            Period::Month => f.write_str("30d"),
            Period::Quarter => f.write_str("90d"),
            Period::Year => f.write_str("1y"),
            Period::Custom { start, end } => write!(f, "{}..{}", start.format(DATE_FORMAT), end.format(DATE_FORMAT)),
        }
    }
}

impl FromStr for Period {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(Period::Week),
            "30d" => Ok(Period::Month),
            "90d" => Ok(Period::Quarter),
            "1y" => Ok(Period::Year),
            other => {
                let invalid = || ResourceError::InvalidFilter {
                    field: "period".to_string(),
                    reason: format!("'{}' is not 7d, 30d, 90d, 1y or a start..end range", other),
                };
                let (start, end) = other.split_once("..").ok_or_else(invalid)?;
                let start = NaiveDate::parse_from_str(start, DATE_FORMAT).map_err(|_| invalid())?;
                let end = NaiveDate::parse_from_str(end, DATE_FORMAT).map_err(|_| invalid())?;
                Period::custom(start, end)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub period: Period,
    pub revenue: Section<Vec<SeriesPoint>>,
    pub orders_by_status: Section<Vec<BreakdownSlice>>,
    pub user_growth: Section<Vec<SeriesPoint>>,
    pub top_plans: Section<Vec<TopPlan>>,
    pub vendors: Section<Vec<VendorPerformance>>,
}

impl AnalyticsReport {
    pub fn total_revenue(&self) -> f64 {
        self.revenue.loaded().map(|points| points.iter().map(|p| p.value).sum()).unwrap_or_default()
    }

    pub fn total_orders(&self) -> u64 {
        self.orders_by_status.loaded().map(|slices| slices.iter().map(|s| s.count).sum()).unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct AnalyticsService {
    transport: SharedTransport,
}

impl AnalyticsService {
    pub fn new(transport: SharedTransport) -> Self {
        Self { transport }
    }

    #[instrument(name = "analytics", skip(self, period), fields(period = %period))]
    pub async fn load(&self, period: Period) -> AnalyticsReport {
        let query = period.query();
        let paths = [
            endpoints::ANALYTICS_REVENUE,
            endpoints::ANALYTICS_ORDERS,
            endpoints::ANALYTICS_USERS,
            endpoints::ANALYTICS_PLANS,
            endpoints::ANALYTICS_VENDORS,
        ];
        let calls = paths
            .iter()
            .map(|path| self.transport.send(ApiRequest::get(*path).with_query(query.clone())));
        let mut results = join_all(calls).await.into_iter();
        let mut next = || results.next().unwrap_or_else(|| Ok(serde_json::Value::Null));

        let report = AnalyticsReport {
            period,
            revenue: list_section("revenue", next(), "revenue", "No revenue in this period"),
            orders_by_status: list_section("orders", next(), "orders", "No orders in this period"),
            user_growth: list_section("users", next(), "users", "No new users in this period"),
            top_plans: list_section("top_plans", next(), "plans", "No plan purchases in this period"),
            vendors: list_section("vendors", next(), "vendors", "No vendor activity in this period"),
        };
        info!(revenue = report.total_revenue(), orders = report.total_orders(), "Analytics loaded");
        report
    }
}
