//! Backend documents as the console sees them.
//!
//! The backend owns every schema. Fields are optional or defaulted and
//! anything unrecognised is kept in `extra`, so a new backend field never
//! breaks a page.

pub mod daily_meal;
pub mod dashboard;
pub mod order;
pub mod promo_code;
pub mod purchase;
pub mod review;
pub mod subscription;
pub mod user;
pub mod vendor_assignment;
pub mod zone;

pub use daily_meal::*;
pub use dashboard::*;
pub use order::*;
pub use promo_code::*;
pub use purchase::*;
pub use review::*;
pub use subscription::*;
pub use user::*;
pub use vendor_assignment::*;
pub use zone::*;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A reference that the backend sends either as a bare id or populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref {
    Id(String),
    Doc(Map<String, Value>),
}

impl Ref {
    pub fn id(&self) -> Option<&str> {
        match self {
            Ref::Id(id) => Some(id),
            Ref::Doc(doc) => doc.get("_id").or_else(|| doc.get("id")).and_then(Value::as_str),
        }
    }

    /// A string field of the populated document, e.g. `name`.
    pub fn field(&self, key: &str) -> Option<&str> {
        match self {
            Ref::Id(_) => None,
            Ref::Doc(doc) => doc.get(key).and_then(Value::as_str),
        }
    }
}

/// Reads an explicit `null` as the field's default. Missing fields are
/// already covered by the container's `#[serde(default)]`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
