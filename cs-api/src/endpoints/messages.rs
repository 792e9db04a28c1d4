//! Direct messaging endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;

use cs_core::error::CsResult;

use crate::client::{ApiClient, RequestOptions};
use crate::endpoints::segment;
use crate::response::{flexible_count, flexible_id, Entity};

/// A conversation summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub participant_id: Option<String>,
    pub participant_name: Option<String>,
    pub last_message: Option<String>,
    #[serde(default, deserialize_with = "flexible_count")]
    pub unread_count: Option<u32>,
    pub updated_at: Option<String>,
}

impl Entity for Conversation {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("_id", "id"), ("userId", "participantId")];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub sender: Option<String>,
    pub text: Option<String>,
    pub created_at: Option<String>,
}

impl Entity for ChatMessage {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("_id", "id"), ("senderId", "sender"), ("content", "text")];
}

impl ApiClient {
    pub async fn conversations(&self) -> CsResult<Vec<Conversation>> {
        let resp = self.get("/messages/conversations").await?;
        resp.entities(&["data", "conversations"])
    }

    /// Messages exchanged with another user.
    pub async fn conversation_messages(&self, user_id: &str) -> CsResult<Vec<ChatMessage>> {
        let resp = self.get(&format!("/messages/{}", segment(user_id))).await?;
        resp.entities(&["data", "messages"])
    }

    pub async fn send_message(&self, user_id: &str, text: &str) -> CsResult<ChatMessage> {
        let resp = self
            .post(
                &format!("/messages/{}", segment(user_id)),
                json!({ "text": text }),
                RequestOptions::default(),
            )
            .await?;
        resp.entity(&["data", "message"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_aliases() {
        let m = ChatMessage::from_value(serde_json::json!({
            "_id": 9,
            "senderId": "u2",
            "content": "hello"
        }))
        .unwrap();
        assert_eq!(m.id.as_deref(), Some("9"));
        assert_eq!(m.sender.as_deref(), Some("u2"));
        assert_eq!(m.text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_conversation_with_both_spellings() {
        let c = Conversation::from_value(serde_json::json!({
            "_id": "c1",
            "id": "c1",
            "userId": "u9",
            "participantId": "u9",
            "unreadCount": "2"
        }))
        .unwrap();
        assert_eq!(c.participant_id.as_deref(), Some("u9"));
        assert_eq!(c.unread_count, Some(2));
    }
}
