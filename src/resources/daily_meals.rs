use serde_json::json;

use crate::actor_framework::{Mutation, Resource};
use crate::api::{endpoints, ApiRequest};
use crate::domain::{DailyMeal, DailyMealDraft};
use crate::filters::FilterField;

#[derive(Debug, Clone, Copy, Default)]
pub struct DailyMeals;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyMealPageStats {
    pub total_meals: usize,
    pub active: usize,
    pub lunch_items: usize,
    pub dinner_items: usize,
}

#[derive(Debug, Clone)]
pub enum DailyMealAction {
    Create(DailyMealDraft),
    Update { id: String, draft: DailyMealDraft },
    ToggleActive { id: String },
    Delete { id: String },
}

impl Resource for DailyMeals {
    type Item = DailyMeal;
    type Detail = DailyMeal;
    type Stats = DailyMealPageStats;
    type Action = DailyMealAction;

    const NAME: &'static str = "daily meals";
    const EMPTY_MESSAGE: &'static str = "No daily meals found";
    const LIST_PATH: &'static str = endpoints::DAILY_MEALS;
    const LIST_KEY: &'static str = "dailyMeals";
    const DETAIL_KEY: Option<&'static str> = Some("dailyMeal");

    fn filter_schema() -> &'static [FilterField] {
        const SCHEMA: &[FilterField] = &[
            FilterField::date("mealDate"),
            FilterField::date("startDate"),
            FilterField::date("endDate"),
            FilterField::one_of("vendorType", &["home_chef", "food_vendor"]),
            FilterField::boolean("isActive"),
            FilterField::text("subscriptionId"),
        ];
        SCHEMA
    }

    fn detail_path(id: &str) -> String {
        endpoints::daily_meal(id)
    }

    fn page_stats(items: &[DailyMeal]) -> DailyMealPageStats {
        DailyMealPageStats {
            total_meals: items.len(),
            active: items.iter().filter(|m| m.is_active).count(),
            lunch_items: items.iter().map(|m| m.selected_menus.lunch_menus.len()).sum(),
            dinner_items: items.iter().map(|m| m.selected_menus.dinner_menus.len()).sum(),
        }
    }

    fn mutation(action: &DailyMealAction) -> Result<Mutation, String> {
        match action {
            DailyMealAction::Create(draft) => {
                draft.validate()?;
                Ok(Mutation::new(
                    ApiRequest::post(endpoints::DAILY_MEALS, json!(draft)),
                    "Daily meal created",
                    "Failed to create daily meal",
                ))
            }
            DailyMealAction::Update { id, draft } => {
                draft.validate()?;
                Ok(Mutation::new(
                    ApiRequest::put(endpoints::daily_meal(id), json!(draft)),
                    "Daily meal updated",
                    "Failed to update daily meal",
                ))
            }
            DailyMealAction::ToggleActive { id } => Ok(Mutation::new(
                ApiRequest::patch(endpoints::daily_meal_toggle(id), None),
                "Daily meal status updated",
                "Failed to update daily meal status",
            )),
            DailyMealAction::Delete { id } => Ok(Mutation::new(
                ApiRequest::delete(endpoints::daily_meal(id)),
                "Daily meal deleted",
                "Failed to delete daily meal",
            )
            .confirm("Are you sure you want to delete this daily meal?")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SelectedMenus;
    use crate::filters::FilterState;
    use serde_json::json;

    fn draft() -> DailyMealDraft {
        DailyMealDraft {
            meal_date: "2025-03-14".into(),
            subscription_id: "sub1".into(),
            vendor_type: Some("home_chef".into()),
            selected_menus: SelectedMenus { lunch_menus: vec![json!("m1")], dinner_menus: vec![] },
            notes: None,
        }
    }

    #[test]
    fn test_create_validates_before_request() {
        let mut bad = draft();
        bad.selected_menus = SelectedMenus::default();
        assert!(DailyMeals::mutation(&DailyMealAction::Create(bad)).is_err());

        let mut bad = draft();
        bad.meal_date = "14/03/2025".into();
        assert!(DailyMeals::mutation(&DailyMealAction::Create(bad)).is_err());

        let m = DailyMeals::mutation(&DailyMealAction::Create(draft())).unwrap();
        let body = m.request.body.unwrap();
        assert_eq!(body["mealDate"], "2025-03-14");
        assert_eq!(body["selectedMenus"]["lunchMenus"], json!(["m1"]));
        assert!(body.get("notes").is_none());
    }

    #[test]
    fn test_page_stats_sum_menu_items() {
        let items: Vec<DailyMeal> = serde_json::from_value(json!([
            { "_id": "a", "isActive": true, "selectedMenus": { "lunchMenus": [1, 2], "dinnerMenus": [3] } },
            { "_id": "b", "isActive": false, "selectedMenus": { "lunchMenus": [4] } }
        ]))
        .unwrap();
        let stats = DailyMeals::page_stats(&items);
        assert_eq!(stats, DailyMealPageStats { total_meals: 2, active: 1, lunch_items: 3, dinner_items: 1 });
    }

    #[test]
    fn test_inactive_filter_is_sent() {
        let state = FilterState::new(10).with("isActive", false);
        assert!(state
            .sanitize(DailyMeals::filter_schema())
            .contains(&("isActive".to_string(), "false".to_string())));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let m = DailyMeals::mutation(&DailyMealAction::Delete { id: "d1".into() }).unwrap();
        assert!(m.confirm.is_some());
        assert_eq!(m.request.path, "admin/daily-meals/d1");
    }

    #[test]
    fn test_odd_rows_still_decode() {
        let items = crate::resources::decode_rows::<DailyMeals>(json!([
            { "_id": "m1", "isActive": null, "selectedMenus": null, "vendorType": "cloud_kitchen" }
        ]));
        assert!(!items[0].is_active);
        assert!(items[0].selected_menus.is_empty());
        assert_eq!(items[0].vendor_type.as_deref(), Some("cloud_kitchen"));
    }
}
