use serde_json::json;

use crate::actor_framework::{Mutation, Resource};
use crate::api::{endpoints, ApiRequest};
use crate::domain::{PromoCode, PromoCodeDraft};
use crate::filters::FilterField;

#[derive(Debug, Clone, Copy, Default)]
pub struct PromoCodes;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromoPageStats {
    pub total: usize,
    pub active: usize,
    pub exhausted: usize,
    pub total_redemptions: u64,
}

#[derive(Debug, Clone)]
pub enum PromoAction {
    Create(PromoCodeDraft),
    Update { id: String, draft: PromoCodeDraft },
    ToggleStatus { id: String },
    Delete { id: String },
}

impl Resource for PromoCodes {
    type Item = PromoCode;
    type Detail = PromoCode;
    type Stats = PromoPageStats;
    type Action = PromoAction;

    const NAME: &'static str = "promo codes";
    const EMPTY_MESSAGE: &'static str = "No promo codes found";
    const LIST_PATH: &'static str = endpoints::PROMO_CODES;
    const LIST_KEY: &'static str = "promoCodes";
    const DETAIL_KEY: Option<&'static str> = Some("promoCode");

    fn filter_schema() -> &'static [FilterField] {
        const SCHEMA: &[FilterField] = &[
            FilterField::one_of("status", &["active", "inactive", "expired"]),
            FilterField::one_of("discountType", &["percentage", "fixed"]),
            FilterField::text("search"),
        ];
        SCHEMA
    }

    fn detail_path(id: &str) -> String {
        endpoints::promo_code(id)
    }

    fn page_stats(items: &[PromoCode]) -> PromoPageStats {
        PromoPageStats {
            total: items.len(),
            active: items.iter().filter(|p| p.is_active).count(),
            exhausted: items.iter().filter(|p| p.is_exhausted()).count(),
            total_redemptions: items.iter().map(|p| u64::from(p.used_count)).sum(),
        }
    }

    fn mutation(action: &PromoAction) -> Result<Mutation, String> {
        match action {
            PromoAction::Create(draft) => {
                draft.validate()?;
                Ok(Mutation::new(
                    ApiRequest::post(endpoints::PROMO_CODES, json!(draft.clone().normalized())),
                    "Promo code created",
                    "Failed to create promo code",
                ))
            }
            PromoAction::Update { id, draft } => {
                draft.validate()?;
                Ok(Mutation::new(
                    ApiRequest::put(endpoints::promo_code(id), json!(draft.clone().normalized())),
                    "Promo code updated",
                    "Failed to update promo code",
                ))
            }
            PromoAction::ToggleStatus { id } => Ok(Mutation::new(
                ApiRequest::patch(endpoints::promo_code_toggle(id), None),
                "Promo code status updated",
                "Failed to update promo code status",
            )),
            PromoAction::Delete { id } => Ok(Mutation::new(
                ApiRequest::delete(endpoints::promo_code(id)),
                "Promo code deleted",
                "Failed to delete promo code",
            )
            .confirm("Are you sure you want to delete this promo code?")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DiscountType;

    fn draft() -> PromoCodeDraft {
        PromoCodeDraft {
            code: "welcome50".into(),
            description: "Half off the first week".into(),
            discount_type: DiscountType::Percentage,
            discount_value: Some(50.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_discount_value_is_blocked() {
        let mut d = draft();
        d.discount_value = None;
        assert_eq!(
            PromoCodes::mutation(&PromoAction::Create(d)).unwrap_err(),
            "Please fill in code, description and discount value"
        );
    }

    #[test]
    fn test_discount_bounds() {
        let mut d = draft();
        d.discount_value = Some(120.0);
        assert!(d.validate().is_err());

        d.discount_type = DiscountType::Fixed;
        assert!(d.validate().is_ok());

        d.discount_value = Some(0.0);
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_validity_window_order() {
        let mut d = draft();
        d.valid_from = Some("2025-02-01".into());
        d.valid_until = Some("2025-01-01".into());
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_create_uppercases_code() {
        let m = PromoCodes::mutation(&PromoAction::Create(draft())).unwrap();
        let body = m.request.body.unwrap();
        assert_eq!(body["code"], "WELCOME50");
        assert_eq!(body["discountType"], "percentage");
        assert!(body.get("usageLimit").is_none());
    }

    #[test]
    fn test_odd_rows_still_decode() {
        let items = crate::resources::decode_rows::<PromoCodes>(serde_json::json!([
            { "_id": "c1", "code": "BOGO", "discountType": "buy_one_get_one", "usedCount": null, "applicableCategories": null }
        ]));
        assert_eq!(items[0].discount_type, DiscountType::Unknown);
        assert_eq!(items[0].used_count, 0);
        assert!(items[0].applicable_categories.is_empty());
    }
}
