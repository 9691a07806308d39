use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{is_blank, null_as_default};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromoCode {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_type: DiscountType,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_value: f64,
    pub max_discount: Option<f64>,
    pub min_order_value: Option<f64>,
    pub usage_limit: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub used_count: u32,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub applicable_categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PromoCode {
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit.is_some_and(|limit| self.used_count >= limit)
    }
}

/// The promo code form. `discount_value` stays optional so that an
/// unfilled field can be told apart from an explicit zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeDraft {
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applicable_categories: Vec<String>,
}

impl PromoCodeDraft {
    pub fn validate(&self) -> Result<(), String> {
        let value = match self.discount_value {
            Some(v) if !is_blank(&self.code) && !is_blank(&self.description) => v,
            _ => return Err("Please fill in code, description and discount value".to_string()),
        };
        if value <= 0.0 {
            return Err("Discount value must be greater than zero".to_string());
        }
        if self.discount_type == DiscountType::Percentage && value > 100.0 {
            return Err("Percentage discount cannot exceed 100".to_string());
        }
        if let (Some(from), Some(until)) = (&self.valid_from, &self.valid_until) {
            if until < from {
                return Err("Valid until must be after valid from".to_string());
            }
        }
        Ok(())
    }

    /// Codes are stored upper-case.
    pub fn normalized(mut self) -> Self {
        self.code = self.code.trim().to_uppercase();
        self
    }
}
