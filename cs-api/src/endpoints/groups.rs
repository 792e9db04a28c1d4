//! Group endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;

use cs_core::error::CsResult;

use crate::client::{ApiClient, RequestOptions};
use crate::endpoints::segment;
use crate::response::{flexible_count, flexible_id, Entity};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flexible_count")]
    pub member_count: Option<u32>,
    pub invite_code: Option<String>,
}

impl Entity for Group {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("_id", "id"), ("membersCount", "memberCount")];
}

impl ApiClient {
    /// Groups the user belongs to.
    pub async fn groups(&self) -> CsResult<Vec<Group>> {
        let resp = self.get("/groups").await?;
        resp.entities(&["data", "groups"])
    }

    pub async fn create_group(&self, name: &str, description: Option<&str>) -> CsResult<Group> {
        let resp = self
            .post(
                "/groups",
                json!({ "name": name, "description": description }),
                RequestOptions::default(),
            )
            .await?;
        resp.entity(&["data", "group"])
    }

    /// Join by invite code. Joining twice is a no-op server-side, so ambiguous
    /// failures may be retried.
    pub async fn join_group(&self, invite_code: &str) -> CsResult<Group> {
        let resp = self
            .post(
                "/groups/join",
                json!({ "inviteCode": invite_code }),
                RequestOptions::retry_unsafe(),
            )
            .await?;
        resp.entity(&["data", "group"])
    }

    pub async fn leave_group(&self, id: &str) -> CsResult<()> {
        self.post(
            &format!("/groups/{}/leave", segment(id)),
            json!({}),
            RequestOptions::retry_unsafe(),
        )
        .await?;
        Ok(())
    }
}
