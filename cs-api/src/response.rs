//! Response types.
//!
//! The backend is inconsistent about shapes: some routes answer
//! `{ "success": true, "data": ... }`, others put domain fields at the top
//! level. The client does not guess. It returns the status plus the parsed
//! body, and each endpoint helper unwraps the shape it expects.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use cs_core::error::{CsError, CsResult};

use crate::transport::RawResponse;

/// Parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Json(serde_json::Value),
    /// The body was not JSON (including empty bodies); raw text kept.
    Text(String),
}

impl ResponseBody {
    /// Parse body text, falling back to the raw text.
    pub fn parse(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    /// Convert into a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> serde_json::Value {
        match self {
            ResponseBody::Json(v) => v,
            ResponseBody::Text(t) => serde_json::Value::String(t),
        }
    }
}

/// Status plus parsed body of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn from_raw(raw: RawResponse) -> Self {
        Self {
            status: raw.status,
            body: ResponseBody::parse(raw.body),
        }
    }

    /// Whether the HTTP status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The JSON body, if the body was JSON.
    pub fn json(&self) -> Option<&serde_json::Value> {
        match &self.body {
            ResponseBody::Json(v) => Some(v),
            ResponseBody::Text(_) => None,
        }
    }

    /// The raw text, if the body was not JSON.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Text(t) => Some(t),
            ResponseBody::Json(_) => None,
        }
    }

    /// A top-level field of a JSON object body.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.json().and_then(|v| v.get(name))
    }

    /// The `success` flag. Bodies without one count as successful.
    pub fn success_flag(&self) -> bool {
        self.field("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    /// The server's `message` string, if any.
    pub fn message(&self) -> Option<&str> {
        self.field("message").and_then(|v| v.as_str())
    }

    /// Deserialize the whole body.
    pub fn deserialize<T: DeserializeOwned>(&self) -> CsResult<T> {
        Ok(T::deserialize(self.json_or_err()?)?)
    }

    /// Deserialize the `data` field of a `{ success, data }` envelope.
    pub fn data<T: DeserializeOwned>(&self) -> CsResult<T> {
        let value = self
            .field("data")
            .ok_or_else(|| CsError::Serialization("response has no data field".into()))?;
        Ok(T::deserialize(value)?)
    }

    /// Deserialize the first of `keys` present at the top level, or the
    /// whole body when it is itself an array.
    pub fn list<T: DeserializeOwned>(&self, keys: &[&str]) -> CsResult<Vec<T>> {
        match self.find_list(keys)? {
            Some(items) => Ok(Vec::<T>::deserialize(items)?),
            None => Ok(Vec::new()),
        }
    }

    /// Deserialize an object found under the first present key, or the body itself.
    pub fn object<T: DeserializeOwned>(&self, keys: &[&str]) -> CsResult<T> {
        Ok(T::deserialize(self.find_object(keys)?)?)
    }

    /// Like [`list`](Self::list), folding each record's field aliases first.
    pub fn entities<T: Entity>(&self, keys: &[&str]) -> CsResult<Vec<T>> {
        match self.find_list(keys)? {
            Some(Value::Array(items)) => items.iter().cloned().map(T::from_value).collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Like [`object`](Self::object), folding field aliases first.
    pub fn entity<T: Entity>(&self, keys: &[&str]) -> CsResult<T> {
        T::from_value(self.find_object(keys)?.clone())
    }

    fn json_or_err(&self) -> CsResult<&Value> {
        self.json()
            .ok_or_else(|| CsError::Serialization("response body is not JSON".into()))
    }

    /// The list value; `None` when the key is missing or null.
    fn find_list(&self, keys: &[&str]) -> CsResult<Option<&Value>> {
        let value = self.json_or_err()?;
        if value.is_array() {
            return Ok(Some(value));
        }
        match keys.iter().find_map(|k| value.get(*k)) {
            Some(found) if found.is_array() => Ok(Some(found)),
            Some(Value::Null) | None => Ok(None),
            Some(_) => Err(CsError::Serialization(format!(
                "expected a list under one of {keys:?}"
            ))),
        }
    }

    fn find_object(&self, keys: &[&str]) -> CsResult<&Value> {
        let value = self.json_or_err()?;
        Ok(keys
            .iter()
            .find_map(|k| value.get(*k).filter(|v| v.is_object()))
            .unwrap_or(value))
    }

    /// Consume into a plain JSON value.
    pub fn into_value(self) -> serde_json::Value {
        self.body.into_value()
    }
}

/// A backend record whose fields may arrive under more than one name.
///
/// `ALIASES` holds `(alternate, canonical)` wire keys. Before deserializing,
/// each alternate key is moved to its canonical key, or dropped when the
/// canonical key already holds a value, so a payload carrying both `_id`
/// and `id` deserializes instead of failing on a duplicate field.
pub trait Entity: DeserializeOwned {
    const ALIASES: &'static [(&'static str, &'static str)] = &[("_id", "id")];

    /// Fold aliases in a raw record. Records with nested entities extend this.
    fn canonicalize(value: &mut Value) {
        fold_aliases(value, Self::ALIASES);
    }

    fn from_value(mut value: Value) -> CsResult<Self> {
        Self::canonicalize(&mut value);
        Ok(serde_json::from_value(value)?)
    }
}

/// Move alternate keys of an object onto their canonical names.
pub fn fold_aliases(value: &mut Value, aliases: &[(&str, &str)]) {
    let Value::Object(map) = value else {
        return;
    };
    for (alternate, canonical) in aliases {
        if let Some(v) = map.remove(*alternate) {
            let canonical_set = map.get(*canonical).is_some_and(|c| !c.is_null());
            if !canonical_set {
                map.insert((*canonical).to_string(), v);
            }
        }
    }
}

/// Accept ids sent either as strings or numbers (`"12"`, `12`).
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept integers, floats and numeric strings; anything else is `None`.
pub(crate) fn flexible_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// Non-negative counts, with the same leniency as [`flexible_number`].
pub(crate) fn flexible_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(flexible_number(deserializer)?
        .filter(|n| *n >= 0.0)
        .map(|n| n.round() as u32))
}

/// Booleans sent as `true`, `1` or `"true"`; null and unknown shapes are `None`.
pub(crate) fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::from_raw(RawResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn test_json_body() {
        let resp = response(200, r#"{"success":true,"credits":450}"#);
        assert!(resp.is_success());
        assert!(resp.success_flag());
        assert_eq!(resp.field("credits"), Some(&serde_json::json!(450)));
    }

    #[test]
    fn test_text_fallback() {
        let resp = response(200, "pong");
        assert_eq!(resp.text(), Some("pong"));
        assert!(resp.json().is_none());
        assert_eq!(resp.into_value(), serde_json::json!("pong"));
    }

    #[test]
    fn test_empty_body_is_text() {
        assert_eq!(response(204, "").body, ResponseBody::Text(String::new()));
    }

    #[test]
    fn test_data_envelope() {
        let resp = response(200, r#"{"success":true,"data":{"id":"c1","name":"Ada"}}"#);
        let data: serde_json::Value = resp.data().unwrap();
        assert_eq!(data["name"], "Ada");
        assert!(response(200, r#"{"success":true}"#).data::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_list_shapes() {
        let top: Vec<u32> = response(200, "[1,2,3]").list(&["data"]).unwrap();
        assert_eq!(top, vec![1, 2, 3]);

        let keyed: Vec<u32> = response(200, r#"{"success":true,"cards":[4,5]}"#)
            .list(&["data", "cards"])
            .unwrap();
        assert_eq!(keyed, vec![4, 5]);

        let missing: Vec<u32> = response(200, r#"{"success":true}"#).list(&["data"]).unwrap();
        assert!(missing.is_empty());

        assert!(response(200, r#"{"data":{"x":1}}"#).list::<u32>(&["data"]).is_err());
    }

    #[test]
    fn test_object_prefers_key_then_body() {
        #[derive(Deserialize)]
        struct Balance {
            credits: i64,
        }
        let wrapped: Balance = response(200, r#"{"data":{"credits":5}}"#)
            .object(&["data"])
            .unwrap();
        assert_eq!(wrapped.credits, 5);
        let flat: Balance = response(200, r#"{"success":true,"credits":7}"#)
            .object(&["data"])
            .unwrap();
        assert_eq!(flat.credits, 7);
    }

    #[test]
    fn test_flexible_id() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "flexible_id")]
            id: Option<String>,
        }
        let a: Row = serde_json::from_str(r#"{"id": 12}"#).unwrap();
        let b: Row = serde_json::from_str(r#"{"id": "ab"}"#).unwrap();
        let c: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(a.id.as_deref(), Some("12"));
        assert_eq!(b.id.as_deref(), Some("ab"));
        assert!(c.id.is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Tx {
        #[serde(default, deserialize_with = "flexible_id")]
        id: Option<String>,
        #[serde(default, deserialize_with = "flexible_number")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "flexible_count")]
        count: Option<u32>,
        #[serde(default, deserialize_with = "flexible_bool")]
        seen: Option<bool>,
    }

    impl Entity for Tx {}

    #[test]
    fn test_flexible_number_shapes() {
        let tx: Tx = serde_json::from_value(serde_json::json!({
            "amount": "12.5", "count": 3.0, "seen": 1
        }))
        .unwrap();
        assert_eq!(tx.amount, Some(12.5));
        assert_eq!(tx.count, Some(3));
        assert_eq!(tx.seen, Some(true));

        let tx: Tx = serde_json::from_value(serde_json::json!({
            "amount": "lots", "count": -2, "seen": null
        }))
        .unwrap();
        assert!(tx.amount.is_none());
        assert!(tx.count.is_none());
        assert!(tx.seen.is_none());

        let tx: Tx = serde_json::from_value(serde_json::json!({"amount": 450})).unwrap();
        assert_eq!(tx.amount, Some(450.0));
    }

    #[test]
    fn test_fold_aliases_prefers_canonical() {
        let mut both = serde_json::json!({"_id": "a", "id": "b"});
        fold_aliases(&mut both, &[("_id", "id")]);
        assert_eq!(both, serde_json::json!({"id": "b"}));

        let mut only_alt = serde_json::json!({"_id": "a", "id": null});
        fold_aliases(&mut only_alt, &[("_id", "id")]);
        assert_eq!(only_alt, serde_json::json!({"id": "a"}));
    }

    #[test]
    fn test_entities_tolerate_duplicate_ids() {
        let resp = response(200, r#"{"data":[{"_id":"t1","id":"t1"},{"_id":7,"amount":"3"}]}"#);
        let rows: Vec<Tx> = resp.entities(&["data"]).unwrap();
        assert_eq!(rows[0].id.as_deref(), Some("t1"));
        assert_eq!(rows[1].id.as_deref(), Some("7"));
        assert_eq!(rows[1].amount, Some(3.0));
        assert!(response(200, r#"{"data":null}"#).entities::<Tx>(&["data"]).unwrap().is_empty());
    }
}
