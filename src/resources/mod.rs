//! The admin list pages. Each one is a [`Resource`](crate::actor_framework::Resource)
//! plugged into the generic list actor.

pub mod daily_meals;
pub mod orders;
pub mod promo_codes;
pub mod purchases;
pub mod reviews;
pub mod subscriptions;
pub mod users;
pub mod vendor_assignments;
pub mod zones;

pub use daily_meals::*;
pub use orders::*;
pub use promo_codes::*;
pub use purchases::*;
pub use reviews::*;
pub use subscriptions::*;
pub use users::*;
pub use vendor_assignments::*;
pub use zones::*;

use crate::domain::is_blank;

/// Shared check for actions that need a free-text reason.
pub(crate) fn require_reason(reason: &str, what: &str) -> Result<String, String> {
    if is_blank(reason) {
        Err(format!("Please provide a reason for {}", what))
    } else {
        Ok(reason.trim().to_string())
    }
}

/// Decodes `rows` the way a list fetch would.
#[cfg(test)]
pub(crate) fn decode_rows<R: crate::actor_framework::Resource>(rows: serde_json::Value) -> Vec<R::Item> {
    let mut data = serde_json::Map::new();
    data.insert(R::LIST_KEY.to_string(), rows);
    let body = serde_json::json!({ "data": data });
    crate::api::decode_list::<R::Item>(body, R::LIST_KEY, 1, 10).unwrap().items
}
