use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{is_blank, null_as_default, Ref};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectedMenus {
    #[serde(deserialize_with = "null_as_default")]
    pub lunch_menus: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub dinner_menus: Vec<Value>,
}

impl SelectedMenus {
    pub fn is_empty(&self) -> bool {
        self.lunch_menus.is_empty() && self.dinner_menus.is_empty()
    }
}

/// The menu published for one subscription on one date.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyMeal {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub meal_date: Option<String>,
    pub subscription_id: Option<Ref>,
    pub vendor_type: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub selected_menus: SelectedMenus,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    pub created_by: Option<Ref>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Create/update payload for a daily meal.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMealDraft {
    pub meal_date: String,
    pub subscription_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_type: Option<String>,
    pub selected_menus: SelectedMenus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DailyMealDraft {
    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.meal_date) {
            return Err("Meal date is required".to_string());
        }
        if chrono::NaiveDate::parse_from_str(self.meal_date.trim(), "%Y-%m-%d").is_err() {
            return Err("Meal date must be in YYYY-MM-DD format".to_string());
        }
        if is_blank(&self.subscription_id) {
            return Err("Please select a subscription".to_string());
        }
        if self.selected_menus.is_empty() {
            return Err("Select at least one lunch or dinner menu".to_string());
        }
        Ok(())
    }
}
