use serde_json::json;

use crate::actor_framework::{Mutation, Resource};
use crate::api::{endpoints, ApiRequest};
use crate::domain::{Purchase, PurchaseStatus};
use crate::filters::FilterField;

#[derive(Debug, Clone, Copy, Default)]
pub struct Purchases;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchasePageStats {
    pub total: usize,
    pub active: usize,
    pub credits_granted: u64,
    pub credits_used: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone)]
pub enum PurchaseAction {
    UpdateStatus { id: String, status: PurchaseStatus, reason: Option<String> },
}

impl Resource for Purchases {
    type Item = Purchase;
    type Detail = Purchase;
    type Stats = PurchasePageStats;
    type Action = PurchaseAction;

    const NAME: &'static str = "purchases";
    const EMPTY_MESSAGE: &'static str = "No purchases found";
    const LIST_PATH: &'static str = endpoints::USER_SUBSCRIPTIONS;
    const LIST_KEY: &'static str = "userSubscriptions";
    const DETAIL_KEY: Option<&'static str> = Some("userSubscription");

    fn filter_schema() -> &'static [FilterField] {
        const SCHEMA: &[FilterField] = &[
            FilterField::one_of("status", PurchaseStatus::ALL),
            FilterField::text("search"),
            FilterField::text("userId"),
            FilterField::date("startDate"),
            FilterField::date("endDate"),
        ];
        SCHEMA
    }

    fn detail_path(id: &str) -> String {
        endpoints::user_subscription(id)
    }

    fn page_stats(items: &[Purchase]) -> PurchasePageStats {
        items.iter().fold(PurchasePageStats { total: items.len(), ..Default::default() }, |mut acc, p| {
            if p.status == PurchaseStatus::Active {
                acc.active += 1;
            }
            acc.credits_granted += u64::from(p.credits_granted);
            acc.credits_used += u64::from(p.credits_used);
            acc.revenue += p.amount_paid.unwrap_or_default();
            acc
        })
    }

    fn mutation(action: &PurchaseAction) -> Result<Mutation, String> {
        match action {
            PurchaseAction::UpdateStatus { status: PurchaseStatus::Unknown, .. } => {
                Err("Select a valid status".to_string())
            }
            PurchaseAction::UpdateStatus { id, status, reason } => {
                let request = ApiRequest::patch(
                    endpoints::user_subscription_status(id),
                    Some(json!({ "status": status, "reason": reason })),
                );
                let mutation = Mutation::new(
                    request,
                    format!("Subscription marked as {}", status.as_str()),
                    "Failed to update subscription status",
                );
                Ok(match status {
                    PurchaseStatus::Cancelled => mutation.confirm("Are you sure you want to cancel this subscription?"),
                    _ => mutation,
                })
            }
        }
    }
}
