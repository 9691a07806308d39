//! Admin console for a meal-subscription service.
//!
//! Each admin page (orders, daily meals, plans, purchases, promo codes,
//! zones, reviews, users, vendor assignments) is a [`ListResourceActor`]
//! over the backend's REST API, reached through a typed client. The
//! dashboard and analytics pages are plain services that load their
//! sections concurrently. [`AdminConsole`] starts and stops everything.
//!
//! [`ListResourceActor`]: actor_framework::ListResourceActor
//! [`AdminConsole`]: app_system::AdminConsole

pub mod actor_framework;
pub mod api;
pub mod app_system;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod filters;
pub mod insights;
pub mod notify;
pub mod pagination;
pub mod resources;

#[cfg(test)]
mod mock_framework;
