//! Authentication and profile endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;

use cs_core::error::CsResult;

use crate::client::{ApiClient, RequestOptions};
use crate::response::{flexible_id, flexible_number, Entity};
use crate::session::{self, AuthSession, CachedUser};

/// Profile returned by `/auth/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "flexible_number")]
    pub credits: Option<f64>,
    pub referral_code: Option<String>,
}

impl Entity for UserProfile {}

/// Registration form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
    /// Referral code of the inviting user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

impl ApiClient {
    /// Log in and store the token and user fields.
    ///
    /// `identifier` is a phone number or email address. Login is not retried
    /// after ambiguous failures; a duplicate login is harmless but pointless.
    pub async fn login(&self, identifier: &str, password: &str) -> CsResult<AuthSession> {
        let field = if identifier.contains('@') { "email" } else { "phone" };
        let resp = self
            .post(
                "/auth/login",
                json!({ field: identifier, "password": password }),
                RequestOptions::default(),
            )
            .await?;
        let auth = AuthSession::from_response(&resp)?;
        session::save(self.store().as_ref(), &auth)?;
        Ok(auth)
    }

    /// Create an account and store the resulting session.
    pub async fn register(&self, registration: &Registration) -> CsResult<AuthSession> {
        let resp = self
            .post(
                "/auth/register",
                serde_json::to_value(registration)?,
                RequestOptions::default(),
            )
            .await?;
        let auth = AuthSession::from_response(&resp)?;
        session::save(self.store().as_ref(), &auth)?;
        Ok(auth)
    }

    /// Forget the stored session. No network call.
    pub fn logout(&self) -> CsResult<()> {
        session::clear(self.store().as_ref())
    }

    /// Cached user fields, or `None` when logged out. No network call.
    pub fn current_user(&self) -> CsResult<Option<CachedUser>> {
        session::cached_user(self.store().as_ref())
    }

    /// Fetch the current user's profile.
    pub async fn profile(&self) -> CsResult<UserProfile> {
        let resp = self.get("/auth/profile").await?;
        resp.entity(&["data", "user"])
    }

    /// Update profile fields; `changes` is sent as-is.
    pub async fn update_profile(&self, changes: &serde_json::Value) -> CsResult<UserProfile> {
        let resp = self.put("/auth/profile", changes.clone()).await?;
        resp.entity(&["data", "user"])
    }
}
