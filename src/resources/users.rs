use serde_json::json;

use crate::actor_framework::{Mutation, Resource};
use crate::api::{endpoints, ApiRequest};
use crate::domain::{Role, User};
use crate::filters::FilterField;
use crate::resources::require_reason;

#[derive(Debug, Clone, Copy, Default)]
pub struct Users;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPageStats {
    pub total: usize,
    pub active: usize,
    pub banned: usize,
    pub vendors: usize,
}

#[derive(Debug, Clone)]
pub enum UserAction {
    Ban { id: String, reason: String },
    Unban { id: String },
    ToggleActive { id: String },
    Delete { id: String },
}

impl Resource for Users {
    type Item = User;
    type Detail = User;
    type Stats = UserPageStats;
    type Action = UserAction;

    const NAME: &'static str = "users";
    const EMPTY_MESSAGE: &'static str = "No users found";
    const LIST_PATH: &'static str = endpoints::USERS;
    const LIST_KEY: &'static str = "users";
    const DETAIL_KEY: Option<&'static str> = Some("user");

    fn filter_schema() -> &'static [FilterField] {
        const SCHEMA: &[FilterField] = &[
            FilterField::one_of("role", &["user", "vendor", "admin"]),
            FilterField::boolean("isActive"),
            FilterField::boolean("isBanned"),
            FilterField::text("search"),
        ];
        SCHEMA
    }

    fn detail_path(id: &str) -> String {
        endpoints::user(id)
    }

    fn page_stats(items: &[User]) -> UserPageStats {
        UserPageStats {
            total: items.len(),
            active: items.iter().filter(|u| u.is_active && !u.is_banned).count(),
            banned: items.iter().filter(|u| u.is_banned).count(),
            vendors: items.iter().filter(|u| u.role == Role::Vendor).count(),
        }
    }

    fn mutation(action: &UserAction) -> Result<Mutation, String> {
        match action {
            UserAction::Ban { id, reason } => {
                let reason = require_reason(reason, "banning this user")?;
                Ok(Mutation::new(
                    ApiRequest::post(endpoints::user_ban(id), json!({ "reason": reason })),
                    "User banned",
                    "Failed to ban user",
                )
                .confirm("Are you sure you want to ban this user?"))
            }
            UserAction::Unban { id } => Ok(Mutation::new(
                ApiRequest::post(endpoints::user_unban(id), json!({})),
                "User unbanned",
                "Failed to unban user",
            )),
            UserAction::ToggleActive { id } => Ok(Mutation::new(
                ApiRequest::patch(endpoints::user_toggle(id), None),
                "User status updated",
                "Failed to update user status",
            )),
            UserAction::Delete { id } => Ok(Mutation::new(
                ApiRequest::delete(endpoints::user(id)),
                "User deleted",
                "Failed to delete user",
            )
            .confirm("Are you sure you want to delete this user? This cannot be undone.")),
        }
    }
}
