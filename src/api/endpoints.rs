//! Paths of the admin API, one entry per endpoint the console calls.

use std::fmt::Write;

/// Percent-encodes `id` so it always lands in exactly one path segment.
fn segment(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

macro_rules! by_id {
    ($($name:ident => $fmt:literal),* $(,)?) => {
        $(
            pub fn $name(id: &str) -> String {
                format!($fmt, segment(id))
            }
        )*
    };
}

// Orders
pub const ORDERS: &str = "admin/orders";
pub const ORDER_STATS: &str = "admin/orders/stats";
by_id! {
    order => "admin/orders/{}",
    order_status => "admin/orders/{}/status",
    order_cancel => "admin/orders/{}/cancel",
}

// Daily meals
pub const DAILY_MEALS: &str = "admin/daily-meals";
by_id! {
    daily_meal => "admin/daily-meals/{}",
    daily_meal_toggle => "admin/daily-meals/{}/toggle-status",
}

// Subscription plans
pub const SUBSCRIPTIONS: &str = "admin/subscriptions";
pub const SUBSCRIPTION_STATS: &str = "admin/subscriptions/stats";
by_id! {
    subscription => "admin/subscriptions/{}",
    subscription_toggle => "admin/subscriptions/{}/toggle-status",
}

// Purchases (user subscriptions)
pub const USER_SUBSCRIPTIONS: &str = "admin/user-subscriptions";
by_id! {
    user_subscription => "admin/user-subscriptions/{}",
    user_subscription_status => "admin/user-subscriptions/{}/status",
}

// Promo codes
pub const PROMO_CODES: &str = "admin/promo-codes";
by_id! {
    promo_code => "admin/promo-codes/{}",
    promo_code_toggle => "admin/promo-codes/{}/toggle-status",
}

// Delivery zones
pub const ZONES: &str = "admin/zones";
by_id! {
    zone => "admin/zones/{}",
    zone_toggle => "admin/zones/{}/toggle-status",
}

// Reviews
pub const REVIEWS: &str = "admin/reviews";
pub const REVIEW_STATS: &str = "admin/reviews/stats";
by_id! {
    review => "admin/reviews/{}",
    review_visibility => "admin/reviews/{}/visibility",
}

// Users
pub const USERS: &str = "admin/users";
by_id! {
    user => "admin/users/{}",
    user_ban => "admin/users/{}/ban",
    user_unban => "admin/users/{}/unban",
    user_toggle => "admin/users/{}/toggle-status",
}

// Vendor assignment requests
pub const VENDOR_ASSIGNMENTS: &str = "admin/vendor-assignments";
pub const VENDOR_ASSIGNMENT_STATS: &str = "admin/vendor-assignments/stats";
by_id! {
    vendor_assignment => "admin/vendor-assignments/{}",
    vendor_assignment_assign => "admin/vendor-assignments/{}/assign",
    vendor_assignment_reject => "admin/vendor-assignments/{}/reject",
}

// Dashboard sections
pub const DASHBOARD_OVERVIEW: &str = "admin/dashboard/overview";
pub const DASHBOARD_RECENT_ORDERS: &str = "admin/dashboard/recent-orders";
pub const DASHBOARD_REVENUE: &str = "admin/dashboard/revenue";
pub const DASHBOARD_SUBSCRIPTIONS: &str = "admin/dashboard/subscription-distribution";

// Analytics sections
pub const ANALYTICS_REVENUE: &str = "admin/analytics/revenue";
pub const ANALYTICS_ORDERS: &str = "admin/analytics/orders";
pub const ANALYTICS_USERS: &str = "admin/analytics/users";
pub const ANALYTICS_PLANS: &str = "admin/analytics/top-plans";
pub const ANALYTICS_VENDORS: &str = "admin/analytics/vendors";
