//! Decoding of the `{ data: ..., pagination? }` response envelope.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::pagination::Pagination;

/// Fallback keys tried when a route does not use the page's own list key.
const LIST_FALLBACK_KEYS: &[&str] = &["items", "docs", "results", "data"];

#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Pulls the item list and pagination out of a list response.
pub fn decode_list<T: DeserializeOwned>(
    body: Value,
    list_key: &str,
    requested_page: u32,
    requested_limit: u32,
) -> Result<ListPage<T>, ApiError> {
    let top_pagination = body.get("pagination").cloned();
    let data = unwrap_data(body);

    let (raw_items, pagination) = match data {
        Value::Array(items) => (Value::Array(items), top_pagination),
        Value::Object(mut map) => {
            let nested_pagination = map.remove("pagination");
            let items = std::iter::once(list_key)
                .chain(LIST_FALLBACK_KEYS.iter().copied())
                .find_map(|k| if matches!(map.get(k), Some(Value::Array(_))) { map.remove(k) } else { None })
                .ok_or_else(|| ApiError::Decode(format!("response has no '{}' list", list_key)))?;
            (items, nested_pagination.or(top_pagination))
        }
        Value::Null => (Value::Array(Vec::new()), top_pagination),
        other => return Err(ApiError::Decode(format!("unexpected list payload: {}", type_name(&other)))),
    };

    let items: Vec<T> = serde_json::from_value(raw_items)?;
    let pagination = match pagination {
        Some(raw) if raw.is_object() => Pagination::from_json(&raw, requested_page, requested_limit),
        _ => Pagination::single_page(items.len(), requested_limit),
    };

    Ok(ListPage { items, pagination })
}

/// Decodes a single document, looking inside `data` and then inside
/// `data.<key>` when the route wraps it once more.
pub fn decode_entity<T: DeserializeOwned>(body: Value, key: Option<&str>) -> Result<T, ApiError> {
    let data = unwrap_data(body);
    let target = match (key, data) {
        (Some(k), Value::Object(mut map)) if map.get(k).is_some_and(Value::is_object) => map.remove(k).unwrap_or_default(),
        (_, data) => data,
    };
    Ok(serde_json::from_value(target)?)
}

/// The admin-readable `message` of an error body.
pub fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error").and_then(|e| e.get("message")))
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or_default(),
        other => other,
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        code: String,
    }

    #[test]
    fn test_nested_list_and_pagination() {
        let body = json!({
            "success": true,
            "data": {
                "promoCodes": [{"code": "A"}, {"code": "B"}],
                "pagination": {"total": 12, "page": 1, "pages": 2, "limit": 10}
            }
        });
        let page: ListPage<Row> = decode_list(body, "promoCodes", 1, 10).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.pagination.total_items, 12);
    }

    #[test]
    fn test_bare_array_with_top_level_pagination() {
        let body = json!({
            "data": [{"code": "A"}],
            "pagination": {"totalItems": 1, "currentPage": 1, "totalPages": 1}
        });
        let page: ListPage<Row> = decode_list(body, "whatever", 1, 10).unwrap();
        assert_eq!(page.items, vec![Row { code: "A".into() }]);
        assert_eq!(page.pagination.total_items, 1);
    }

    #[test]
    fn test_fallback_key_and_missing_pagination() {
        let body = json!({"data": {"items": [{"code": "A"}, {"code": "B"}, {"code": "C"}]}});
        let page: ListPage<Row> = decode_list(body, "zones", 1, 10).unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.pagination, Pagination::single_page(3, 10));
    }

    #[test]
    fn test_missing_list_is_decode_error() {
        let body = json!({"data": {"count": 3}});
        let result: Result<ListPage<Row>, _> = decode_list(body, "zones", 1, 10);
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_null_data_is_empty_list() {
        let page: ListPage<Row> = decode_list(json!({"data": null}), "zones", 1, 10).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[test]
    fn test_decode_entity_unwraps_key() {
        let row: Row = decode_entity(json!({"data": {"promoCode": {"code": "X"}}}), Some("promoCode")).unwrap();
        assert_eq!(row.code, "X");

        let row: Row = decode_entity(json!({"data": {"code": "Y"}}), Some("promoCode")).unwrap();
        assert_eq!(row.code, "Y");
    }

    #[test]
    fn test_server_message_shapes() {
        assert_eq!(server_message(&json!({"message": "Nope"})), Some("Nope".into()));
        assert_eq!(server_message(&json!({"error": {"message": "Deep"}})), Some("Deep".into()));
        assert_eq!(server_message(&json!({"error": "Flat"})), Some("Flat".into()));
        assert_eq!(server_message(&json!({"status": 500})), None);
    }
}
