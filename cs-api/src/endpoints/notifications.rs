//! Push token registration and the notification inbox.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use cs_core::constants::keys;
use cs_core::error::CsResult;
use cs_core::platform::Platform;
use cs_store::KeyValueStore;

use crate::client::{ApiClient, RequestOptions};
use crate::endpoints::segment;
use crate::response::{flexible_bool, flexible_id, Entity};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    /// `None` when the backend did not say; treat as unread.
    #[serde(default, deserialize_with = "flexible_bool")]
    pub read: Option<bool>,
    pub created_at: Option<String>,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read.unwrap_or(false)
    }
}

impl Entity for Notification {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("_id", "id"), ("message", "body"), ("isRead", "read")];
}

impl ApiClient {
    /// Register a push token for this device.
    ///
    /// Skipped when the same token was already registered. Registration is an
    /// upsert server-side, so ambiguous failures are retried.
    pub async fn register_push_token(
        &self,
        token: &str,
        project_id: Option<&str>,
    ) -> CsResult<bool> {
        if self.store().get(keys::PUSH_TOKEN)?.as_deref() == Some(token) {
            debug!("push token already registered");
            return Ok(false);
        }

        self.post(
            "/notifications/register-token",
            json!({
                "token": token,
                "platform": Platform::current().id(),
                "deviceName": Platform::hostname(),
                "projectId": project_id,
            }),
            RequestOptions::retry_unsafe(),
        )
        .await?;

        self.store().set(keys::PUSH_TOKEN, token)?;
        Ok(true)
    }

    pub async fn notifications(&self) -> CsResult<Vec<Notification>> {
        let resp = self.get("/notifications").await?;
        resp.entities(&["data", "notifications"])
    }

    /// Mark one notification as read.
    pub async fn mark_notification_read(&self, id: &str) -> CsResult<()> {
        self.patch(
            &format!("/notifications/{}/read", segment(id)),
            json!({ "read": true }),
        )
        .await?;
        Ok(())
    }
}
