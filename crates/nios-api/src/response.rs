// WAPI response envelopes.
//
// The appliance answers in two shapes depending on `_return_as_object`:
// wrapped (`{ "result": ..., "next_page_id": ... }`) or bare (the object,
// array, or reference string itself). Both are decoded into sum types by
// looking at the JSON shape once, instead of trying each layout in turn.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const RESULT_KEY: &str = "result";
const NEXT_PAGE_KEY: &str = "next_page_id";

// ── Single object ────────────────────────────────────────────────────

/// Response to create / read-by-reference / update / delete.
#[derive(Debug, Clone, PartialEq)]
pub enum GetResponse<T> {
    /// `{ "result": <T> }`
    Wrapped(T),
    /// `<T>`
    Bare(T),
}

impl<T> GetResponse<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped(inner) | Self::Bare(inner) => inner,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for GetResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Object(mut map) if map.contains_key(RESULT_KEY) => {
                let inner = map.remove(RESULT_KEY).unwrap_or(Value::Null);
                serde_json::from_value(inner)
                    .map(Self::Wrapped)
                    .map_err(D::Error::custom)
            }
            other => serde_json::from_value(other)
                .map(Self::Bare)
                .map_err(D::Error::custom),
        }
    }
}

// ── Lists ────────────────────────────────────────────────────────────

/// The object-wrapped list layout, possibly carrying a paging cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<T> {
    pub result: Vec<T>,
    pub next_page_id: Option<String>,
}

/// Response to a list/search call.
#[derive(Debug, Clone, PartialEq)]
pub enum ListResponse<T> {
    /// `{ "result": [..], "next_page_id": ".." }`
    Object(ListResult<T>),
    /// `[..]`
    Array(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Cursor for the next page, if the appliance returned one.
    pub fn next_page_id(&self) -> Option<&str> {
        match self {
            Self::Object(list) => list.next_page_id.as_deref(),
            Self::Array(_) => None,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Object(list) => list.result,
            Self::Array(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Object(list) => list.result.len(),
            Self::Array(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ListResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => serde_json::from_value(Value::Array(items))
                .map(Self::Array)
                .map_err(D::Error::custom),
            Value::Object(mut map) => {
                let result = map
                    .remove(RESULT_KEY)
                    .ok_or_else(|| D::Error::missing_field(RESULT_KEY))?;
                let result: Vec<T> = serde_json::from_value(result).map_err(D::Error::custom)?;
                let next_page_id = match map.remove(NEXT_PAGE_KEY) {
                    Some(Value::String(id)) => Some(id),
                    Some(Value::Null) | None => None,
                    Some(other) => {
                        return Err(D::Error::custom(format!(
                            "next_page_id must be a string, got {other}"
                        )));
                    }
                };
                Ok(Self::Object(ListResult {
                    result,
                    next_page_id,
                }))
            }
            other => Err(D::Error::custom(format!(
                "expected a JSON array or an object with `result`, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn get_response_wrapped_and_bare() {
        let wrapped: GetResponse<Named> =
            serde_json::from_value(json!({ "result": { "name": "a" } })).unwrap();
        assert_eq!(wrapped, GetResponse::Wrapped(Named { name: "a".into() }));

        let bare: GetResponse<Named> = serde_json::from_value(json!({ "name": "b" })).unwrap();
        assert_eq!(bare.into_inner(), Named { name: "b".into() });
    }

    #[test]
    fn delete_returns_reference_in_either_shape() {
        let bare: GetResponse<String> = serde_json::from_value(json!("bfdtemplate/xyz:t1")).unwrap();
        assert_eq!(bare.into_inner(), "bfdtemplate/xyz:t1");

        let wrapped: GetResponse<String> =
            serde_json::from_value(json!({ "result": "bfdtemplate/xyz:t1" })).unwrap();
        assert!(matches!(wrapped, GetResponse::Wrapped(_)));
    }

    #[test]
    fn list_response_object_with_cursor() {
        let list: ListResponse<Named> = serde_json::from_value(json!({
            "result": [{ "name": "a" }, { "name": "b" }],
            "next_page_id": "789c:next"
        }))
        .unwrap();
        assert_eq!(list.next_page_id(), Some("789c:next"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn list_response_bare_array() {
        let list: ListResponse<Named> = serde_json::from_value(json!([{ "name": "a" }])).unwrap();
        assert!(matches!(list, ListResponse::Array(ref v) if v.len() == 1));
        assert_eq!(list.next_page_id(), None);
    }

    #[test]
    fn list_response_rejects_other_shapes() {
        let err = serde_json::from_value::<ListResponse<Named>>(json!("nope")).unwrap_err();
        assert!(err.to_string().contains("expected a JSON array"));

        let err = serde_json::from_value::<ListResponse<Named>>(json!({ "data": [] })).unwrap_err();
        assert!(err.to_string().contains("result"));
    }
}
