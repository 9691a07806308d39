//! Read-only chart pages. Sections load concurrently and each one either
//! renders or shows its own empty state.

pub mod analytics;
pub mod dashboard;
pub mod format;

pub use analytics::*;
pub use dashboard::*;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::api::{decode_entity, decode_list};
use crate::error::ApiError;

/// One independently loaded chart or tile.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Loaded(T),
    /// Nothing to draw; the message says why.
    Empty(String),
}

impl<T> Section<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Section::Loaded(v) => Some(v),
            Section::Empty(_) => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Section::Loaded(_))
    }
}

/// Rows of a section. An empty list is an empty section, not an error.
pub(crate) fn list_section<T: DeserializeOwned>(
    name: &str,
    result: Result<Value, ApiError>,
    list_key: &str,
    empty: &str,
) -> Section<Vec<T>> {
    match result.and_then(|body| decode_list::<T>(body, list_key, 1, 0)) {
        Ok(page) if page.items.is_empty() => Section::Empty(empty.to_string()),
        Ok(page) => Section::Loaded(page.items),
        Err(e) => {
            warn!(section = name, error = %e, "Section failed to load");
            Section::Empty(e.user_message(empty))
        }
    }
}

/// A single document section, e.g. the overview tiles.
pub(crate) fn entity_section<T: DeserializeOwned>(
    name: &str,
    result: Result<Value, ApiError>,
    key: Option<&str>,
    empty: &str,
) -> Section<T> {
    match result.and_then(|body| decode_entity::<T>(body, key)) {
        Ok(v) => Section::Loaded(v),
        Err(e) => {
            warn!(section = name, error = %e, "Section failed to load");
            Section::Empty(e.user_message(empty))
        }
    }
}
