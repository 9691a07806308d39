use serde_json::json;

use crate::actor_framework::{Mutation, Resource};
use crate::api::{endpoints, ApiRequest};
use crate::domain::{PlanDraft, SubscriptionPlan};
use crate::filters::FilterField;

#[derive(Debug, Clone, Copy, Default)]
pub struct Subscriptions;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanPageStats {
    pub total_plans: usize,
    pub active: usize,
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone)]
pub enum PlanAction {
    Create(PlanDraft),
    Update { id: String, draft: PlanDraft },
    ToggleStatus { id: String },
    Delete { id: String },
}

impl Resource for Subscriptions {
    type Item = SubscriptionPlan;
    type Detail = SubscriptionPlan;
    type Stats = PlanPageStats;
    type Action = PlanAction;

    const NAME: &'static str = "subscriptions";
    const EMPTY_MESSAGE: &'static str = "No subscription plans found";
    const LIST_PATH: &'static str = endpoints::SUBSCRIPTIONS;
    const LIST_KEY: &'static str = "subscriptions";
    const DETAIL_KEY: Option<&'static str> = Some("subscription");
    const STATS_PATH: Option<&'static str> = Some(endpoints::SUBSCRIPTION_STATS);

    fn filter_schema() -> &'static [FilterField] {
        const SCHEMA: &[FilterField] = &[
            FilterField::one_of("category", &["veg", "non_veg", "mixed"]),
            FilterField::boolean("isActive"),
            FilterField::text("search"),
            FilterField::one_of("sortBy", &["createdAt", "planName", "price"]),
        ];
        SCHEMA
    }

    fn detail_path(id: &str) -> String {
        endpoints::subscription(id)
    }

    fn page_stats(items: &[SubscriptionPlan]) -> PlanPageStats {
        let average_price = (!items.is_empty())
            .then(|| items.iter().map(|p| p.pricing.effective()).sum::<f64>() / items.len() as f64);
        PlanPageStats {
            total_plans: items.len(),
            active: items.iter().filter(|p| p.is_active).count(),
            average_price,
        }
    }

    fn mutation(action: &PlanAction) -> Result<Mutation, String> {
        match action {
            PlanAction::Create(draft) => {
                draft.validate()?;
                Ok(Mutation::new(
                    ApiRequest::post(endpoints::SUBSCRIPTIONS, json!(draft)),
                    "Subscription plan created",
                    "Failed to create subscription plan",
                ))
            }
            PlanAction::Update { id, draft } => {
                draft.validate()?;
                Ok(Mutation::new(
                    ApiRequest::put(endpoints::subscription(id), json!(draft)),
                    "Subscription plan updated",
                    "Failed to update subscription plan",
                ))
            }
            PlanAction::ToggleStatus { id } => Ok(Mutation::new(
                ApiRequest::patch(endpoints::subscription_toggle(id), None),
                "Subscription plan status updated",
                "Failed to update subscription plan status",
            )),
            PlanAction::Delete { id } => Ok(Mutation::new(
                ApiRequest::delete(endpoints::subscription(id)),
                "Subscription plan deleted",
                "Failed to delete subscription plan",
            )
            .confirm("Are you sure you want to delete this subscription plan?")),
        }
    }
}
