//! Session persistence: the token and cached profile fields in the device store.
//!
//! Login responses come in two shapes, `{ token, user }` and
//! `{ success, data: { token, user } }`. Both are unwrapped here, explicitly,
//! so the rest of the client never has to guess.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use cs_core::constants::keys;
use cs_core::error::{CsError, CsResult};
use cs_store::KeyValueStore;

use crate::response::ApiResponse;

/// Profile fields cached on the device for display without a network call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CachedUser {
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Token and user extracted from a login or registration response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: CachedUser,
}

impl AuthSession {
    pub fn from_response(response: &ApiResponse) -> CsResult<Self> {
        let body = response
            .json()
            .ok_or_else(|| CsError::AuthFailed("login response is not JSON".into()))?;

        let scopes: Vec<&Value> = std::iter::once(body)
            .chain(body.get("data").filter(|d| d.is_object()))
            .collect();

        let token = scopes
            .iter()
            .find_map(|s| first_str(s, &["token", "accessToken"]))
            .ok_or_else(|| {
                let reason = response.message().unwrap_or("no token in response");
                CsError::AuthFailed(reason.to_string())
            })?;

        let user = scopes
            .iter()
            .find_map(|s| s.get("user").filter(|u| u.is_object()))
            .map(|u| CachedUser {
                id: first_id(u, &["id", "_id", "userId"]),
                name: first_str(u, &["name", "fullName"]),
                phone: first_str(u, &["phone", "phoneNumber"]),
            })
            .unwrap_or_default();

        Ok(Self { token, user })
    }
}

fn first_str(value: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|n| value.get(*n).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_id(value: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|n| match value.get(*n) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(num)) => Some(num.to_string()),
        _ => None,
    })
}

/// Write the token and user fields. Absent user fields are removed so a
/// previous account's values do not linger.
pub fn save(store: &dyn KeyValueStore, session: &AuthSession) -> CsResult<()> {
    store.set(keys::AUTH_TOKEN, &session.token)?;
    for (key, value) in [
        (keys::USER_ID, &session.user.id),
        (keys::USER_NAME, &session.user.name),
        (keys::USER_PHONE, &session.user.phone),
    ] {
        match value {
            Some(v) => store.set(key, v)?,
            None => store.remove(key)?,
        }
    }
    info!("session stored for user {}", session.user.id.as_deref().unwrap_or("?"));
    Ok(())
}

/// Remove the token and cached user fields.
pub fn clear(store: &dyn KeyValueStore) -> CsResult<()> {
    store.remove_many(keys::SESSION)?;
    info!("session cleared");
    Ok(())
}

/// Whether a token is stored.
pub fn is_logged_in(store: &dyn KeyValueStore) -> CsResult<bool> {
    Ok(store
        .get(keys::AUTH_TOKEN)?
        .is_some_and(|t| !t.is_empty()))
}

/// Cached user fields, or `None` when logged out.
pub fn cached_user(store: &dyn KeyValueStore) -> CsResult<Option<CachedUser>> {
    if !is_logged_in(store)? {
        return Ok(None);
    }
    Ok(Some(CachedUser {
        id: store.get(keys::USER_ID)?,
        name: store.get(keys::USER_NAME)?,
        phone: store.get(keys::USER_PHONE)?,
    }))
}
