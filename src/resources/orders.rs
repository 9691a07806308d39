use serde_json::json;

use crate::actor_framework::{Mutation, Resource};
use crate::api::{endpoints, ApiRequest};
use crate::domain::{Order, OrderStatus};
use crate::filters::FilterField;
use crate::resources::require_reason;

#[derive(Debug, Clone, Copy, Default)]
pub struct Orders;

/// Counts over the orders currently on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPageStats {
    pub total: usize,
    pub delivered: usize,
    pub in_progress: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub enum OrderAction {
    UpdateStatus { id: String, status: OrderStatus, notes: Option<String> },
    Cancel { id: String, reason: String },
}

impl Resource for Orders {
    type Item = Order;
    type Detail = Order;
    type Stats = OrderPageStats;
    type Action = OrderAction;

    const NAME: &'static str = "orders";
    const EMPTY_MESSAGE: &'static str = "No orders found";
    const LIST_PATH: &'static str = endpoints::ORDERS;
    const LIST_KEY: &'static str = "orders";
    const DETAIL_KEY: Option<&'static str> = Some("order");
    const STATS_PATH: Option<&'static str> = Some(endpoints::ORDER_STATS);

    fn filter_schema() -> &'static [FilterField] {
        const SCHEMA: &[FilterField] = &[
            FilterField::one_of("status", OrderStatus::ALL),
            FilterField::text("search"),
            FilterField::date("startDate"),
            FilterField::date("endDate"),
            FilterField::text("vendorId"),
            FilterField::one_of("sortBy", &["deliveryDate", "createdAt", "status"]),
        ];
        SCHEMA
    }

    fn detail_path(id: &str) -> String {
        endpoints::order(id)
    }

    fn page_stats(items: &[Order]) -> OrderPageStats {
        items.iter().fold(OrderPageStats { total: items.len(), ..Default::default() }, |mut acc, o| {
            match o.status {
                OrderStatus::Delivered => acc.delivered += 1,
                OrderStatus::Preparing | OrderStatus::OutForDelivery => acc.in_progress += 1,
                s if s.is_failed() => acc.failed += 1,
                _ => {}
            }
            acc
        })
    }

    fn mutation(action: &OrderAction) -> Result<Mutation, String> {
        match action {
            OrderAction::UpdateStatus { status: OrderStatus::Unknown, .. } => Err("Select a valid status".to_string()),
            OrderAction::UpdateStatus { id, status, notes } => Ok(Mutation::new(
                ApiRequest::patch(endpoints::order_status(id), Some(json!({ "status": status, "notes": notes }))),
                format!("Order marked as {}", status.as_str().replace('_', " ")),
                "Failed to update order status",
            )),
            OrderAction::Cancel { id, reason } => {
                let reason = require_reason(reason, "cancelling the order")?;
                Ok(Mutation::new(
                    ApiRequest::patch(endpoints::order_cancel(id), Some(json!({ "reason": reason }))),
                    "Order cancelled",
                    "Failed to cancel order",
                )
                .confirm("Are you sure you want to cancel this order?"))
            }
        }
    }
}
