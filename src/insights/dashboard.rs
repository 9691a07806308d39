use tracing::{info, instrument};

use crate::api::{endpoints, ApiRequest, SharedTransport};
use crate::domain::{BreakdownSlice, OverviewStats, RecentOrder, SeriesPoint};
use crate::insights::{entity_section, list_section, Section};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub overview: Section<OverviewStats>,
    pub recent_orders: Section<Vec<RecentOrder>>,
    pub revenue: Section<Vec<SeriesPoint>>,
    pub subscription_mix: Section<Vec<BreakdownSlice>>,
}

impl DashboardSnapshot {
    pub fn loaded_sections(&self) -> usize {
        [
            self.overview.is_loaded(),
            self.recent_orders.is_loaded(),
            self.revenue.is_loaded(),
            self.subscription_mix.is_loaded(),
        ]
        .into_iter()
        .filter(|l| *l)
        .count()
    }
}

#[derive(Clone)]
pub struct DashboardService {
    transport: SharedTransport,
}

impl DashboardService {
    pub fn new(transport: SharedTransport) -> Self {
        Self { transport }
    }

    /// Loads every section at once. Never fails as a whole.
    #[instrument(name = "dashboard", skip(self))]
    pub async fn load(&self) -> DashboardSnapshot {
        let t = &self.transport;
        let (overview, recent, revenue, mix) = tokio::join!(
            t.send(ApiRequest::get(endpoints::DASHBOARD_OVERVIEW)),
            t.send(ApiRequest::get(endpoints::DASHBOARD_RECENT_ORDERS)),
            t.send(ApiRequest::get(endpoints::DASHBOARD_REVENUE)),
            t.send(ApiRequest::get(endpoints::DASHBOARD_SUBSCRIPTIONS)),
        );

        let snapshot = DashboardSnapshot {
            overview: entity_section("overview", overview, Some("overview"), "Overview unavailable"),
            recent_orders: list_section("recent_orders", recent, "orders", "No recent orders"),
            revenue: list_section("revenue", revenue, "revenue", "No revenue data"),
            subscription_mix: list_section("subscription_mix", mix, "distribution", "No subscription data"),
        };
        info!(loaded = snapshot.loaded_sections(), "Dashboard loaded");
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::mock_framework::{create_mock_transport, expect_call};
    use serde_json::json;

    #[tokio::test]
    async fn test_failed_section_does_not_block_others() {
        let (transport, mut calls) = create_mock_transport();
        let service = DashboardService::new(transport);
        let task = tokio::spawn(async move { service.load().await });

        // Answer in whatever order the requests arrive.
        for _ in 0..4 {
            let call = expect_call(&mut calls).await;
            match call.request.path.as_str() {
                endpoints::DASHBOARD_OVERVIEW => call.reply(json!({
                    "data": { "totalUsers": 120, "activeSubscriptions": 45, "todaysOrders": 30, "totalRevenue": 182500.0 }
                })),
                endpoints::DASHBOARD_RECENT_ORDERS => call.reply(json!({ "data": { "orders": [] } })),
                endpoints::DASHBOARD_REVENUE => call.fail(ApiError::Status { status: 500, message: None }),
                endpoints::DASHBOARD_SUBSCRIPTIONS => call.reply(json!({
                    "data": [{ "_id": "monthly", "count": 30 }, { "_id": "weekly", "count": 15 }]
                })),
                other => panic!("unexpected path {}", other),
            }
        }

        let snapshot = task.await.unwrap();
        assert_eq!(snapshot.overview.loaded().map(|o| o.total_users), Some(120));
        assert_eq!(snapshot.recent_orders, Section::Empty("No recent orders".into()));
        assert_eq!(snapshot.revenue, Section::Empty("No revenue data".into()));
        assert_eq!(snapshot.subscription_mix.loaded().map(Vec::len), Some(2));
        assert_eq!(snapshot.loaded_sections(), 2);
    }
}
