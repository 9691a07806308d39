use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{is_blank, null_as_default};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pricing {
    #[serde(deserialize_with = "null_as_default")]
    pub original_price: f64,
    pub discounted_price: Option<f64>,
}

impl Pricing {
    /// What the customer pays.
    pub fn effective(&self) -> f64 {
        self.discounted_price.filter(|p| *p > 0.0).unwrap_or(self.original_price)
    }
}

/// A subscription plan on sale.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriptionPlan {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub plan_name: String,
    pub duration: Option<String>,
    pub duration_days: Option<u32>,
    pub meals_per_plan: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub pricing: Pricing,
    pub category: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub plan_menus: Vec<Value>,
    pub meal_timings: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    pub plan_name: String,
    pub duration_days: u32,
    pub meals_per_plan: u32,
    pub pricing: Pricing,
    pub category: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_menus: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_timings: Option<Value>,
}

impl PlanDraft {
    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.plan_name) {
            return Err("Plan name is required".to_string());
        }
        if is_blank(&self.category) {
            return Err("Category is required".to_string());
        }
        if self.duration_days == 0 {
            return Err("Duration must be at least one day".to_string());
        }
        if self.meals_per_plan == 0 {
            return Err("Meals per plan must be at least one".to_string());
        }
        if self.pricing.original_price <= 0.0 {
            return Err("Price must be greater than zero".to_string());
        }
        if let Some(discounted) = self.pricing.discounted_price {
            if discounted < 0.0 || discounted > self.pricing.original_price {
                return Err("Discounted price must be between zero and the original price".to_string());
            }
        }
        Ok(())
    }
}
