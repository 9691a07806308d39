//! Filter state shared by every list page.
//!
//! A page declares its filters once as a slice of [`FilterField`]s. The schema
//! decides which values are accepted and which ones are dropped before the
//! query string is built, so the same rules apply on every page.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use crate::error::ResourceError;

pub const PAGE: &str = "page";
pub const LIMIT: &str = "limit";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    Number,
    Boolean,
    Date,
    /// Text restricted to a closed set of values.
    Enum(&'static [&'static str]),
}

/// One filter a page accepts.
///
/// `drop_if_empty` only matters for booleans. Boolean filters send an explicit
/// `false` unless built with [`FilterField::drop_false`], which turns `false`
/// into "no filter". Empty text and unset values are always dropped; numbers
/// are always sent, `0` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub kind: FilterKind,
    pub drop_if_empty: bool,
}

impl FilterField {
    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: FilterKind::Text, drop_if_empty: true }
    }

    pub const fn number(name: &'static str) -> Self {
        Self { name, kind: FilterKind::Number, drop_if_empty: true }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self { name, kind: FilterKind::Boolean, drop_if_empty: false }
    }

    pub const fn date(name: &'static str) -> Self {
        Self { name, kind: FilterKind::Date, drop_if_empty: true }
    }

    pub const fn one_of(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self { name, kind: FilterKind::Enum(allowed), drop_if_empty: true }
    }

    /// Treat `false` as "no filter" and leave it out of the request.
    pub const fn drop_false(mut self) -> Self {
        self.drop_if_empty = true;
        self
    }

    fn check(&self, value: &FilterValue) -> Result<(), ResourceError> {
        let invalid = |reason: String| ResourceError::InvalidFilter { field: self.name.to_string(), reason };

        match (self.kind, value) {
            (_, FilterValue::Unset) => Ok(()),
            (FilterKind::Text, FilterValue::Text(_)) => Ok(()),
            (FilterKind::Number, FilterValue::Number(_)) => Ok(()),
            (FilterKind::Boolean, FilterValue::Boolean(_)) => Ok(()),
            (FilterKind::Date, FilterValue::Date(_)) => Ok(()),
            (FilterKind::Date, FilterValue::Text(s)) => {
                if s.trim().is_empty() || NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).is_ok() {
                    Ok(())
                } else {
                    Err(invalid(format!("'{}' is not a YYYY-MM-DD date", s)))
                }
            }
            (FilterKind::Enum(allowed), FilterValue::Text(s)) => {
                if s.is_empty() || allowed.contains(&s.as_str()) {
                    Ok(())
                } else {
                    Err(invalid(format!("'{}' is not one of {:?}", s, allowed)))
                }
            }
            (kind, other) => Err(invalid(format!("expected {:?}, got {}", kind, other.kind_name()))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Unset,
    Text(String),
    Number(i64),
    Boolean(bool),
    Date(NaiveDate),
}

impl FilterValue {
    fn kind_name(&self) -> &'static str {
        match self {
            FilterValue::Unset => "unset",
            FilterValue::Text(_) => "text",
            FilterValue::Number(_) => "number",
            FilterValue::Boolean(_) => "boolean",
            FilterValue::Date(_) => "date",
        }
    }

    fn as_positive(&self) -> Option<u32> {
        match self {
            FilterValue::Number(n) if *n >= 1 => u32::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Unset => Ok(()),
            FilterValue::Text(s) => write!(f, "{}", s.trim()),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Boolean(b) => write!(f, "{}", b),
            FilterValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        FilterValue::Number(i64::from(n))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Boolean(b)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(d: NaiveDate) -> Self {
        FilterValue::Date(d)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FilterValue::Unset)
    }
}

/// The query parameters a page currently shows. Always holds `page` and `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn new(limit: u32) -> Self {
        let mut values = BTreeMap::new();
        values.insert(PAGE.to_string(), FilterValue::Number(1));
        values.insert(LIMIT.to_string(), FilterValue::Number(i64::from(limit.max(1))));
        Self { values }
    }

    /// Builder used for page defaults; skips schema checks.
    pub fn with(mut self, name: &str, value: impl Into<FilterValue>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.values.get(name)
    }

    pub fn page(&self) -> u32 {
        self.values.get(PAGE).and_then(FilterValue::as_positive).unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.values.get(LIMIT).and_then(FilterValue::as_positive).unwrap_or(1)
    }

    /// Applies one change. Any key other than `page` sends the view back to page 1.
    pub fn apply(&mut self, schema: &[FilterField], name: &str, value: FilterValue) -> Result<(), ResourceError> {
        self.apply_all(schema, vec![(name.to_string(), value)])
    }

    /// Applies several changes at once; nothing is written if any of them is rejected.
    pub fn apply_all(&mut self, schema: &[FilterField], changes: Vec<(String, FilterValue)>) -> Result<(), ResourceError> {
        for (name, value) in &changes {
            check(schema, name, value)?;
        }

        let mut page = None;
        for (name, value) in changes {
            if name == PAGE {
                page = Some(value);
            } else {
                self.values.insert(name, value);
                self.values.insert(PAGE.to_string(), FilterValue::Number(1));
            }
        }
        if let Some(page) = page {
            self.values.insert(PAGE.to_string(), page);
        }
        Ok(())
    }

    /// Builds the query string pairs, leaving out empty values.
    pub fn sanitize(&self, schema: &[FilterField]) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter(|(name, value)| keep(schema, name, value))
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }
}

fn check(schema: &[FilterField], name: &str, value: &FilterValue) -> Result<(), ResourceError> {
    if name == PAGE || name == LIMIT {
        return match value.as_positive() {
            Some(_) => Ok(()),
            None => Err(ResourceError::InvalidFilter {
                field: name.to_string(),
                reason: "must be a number of at least 1".to_string(),
            }),
        };
    }

    match schema.iter().find(|f| f.name == name) {
        Some(field) => field.check(value),
        None => Err(ResourceError::UnknownFilter(name.to_string())),
    }
}

fn keep(schema: &[FilterField], name: &str, value: &FilterValue) -> bool {
    match value {
        FilterValue::Unset => false,
        FilterValue::Text(s) => !s.trim().is_empty(),
        FilterValue::Number(_) | FilterValue::Date(_) => true,
        FilterValue::Boolean(true) => true,
        FilterValue::Boolean(false) => schema
            .iter()
            .find(|f| f.name == name)
            .map(|f| !f.drop_if_empty)
            .unwrap_or(false),
    }
}
