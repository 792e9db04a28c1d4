//! Business card endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;

use cs_core::error::CsResult;

use crate::body::{FilePart, MultipartForm};
use crate::client::{ApiClient, RequestOptions};
use crate::endpoints::segment;
use crate::response::{flexible_id, Entity};

/// A business card as returned by the backend. Every field is optional;
/// screens render whatever is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCard {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub owner_id: Option<String>,
    pub owner_name: Option<String>,
}

impl Entity for BusinessCard {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("_id", "id"), ("image", "imageUrl"), ("userId", "ownerId")];
}

impl BusinessCard {
    /// Display title: name, then company, then a placeholder.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.company.as_deref())
            .unwrap_or("Untitled card")
    }
}

/// Fields for a new card.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewCard {
    fn to_form(&self) -> MultipartForm {
        MultipartForm::new()
            .text("name", self.name.as_str())
            .text_opt("title", self.title.as_deref())
            .text_opt("company", self.company.as_deref())
            .text_opt("phone", self.phone.as_deref())
            .text_opt("email", self.email.as_deref())
            .text_opt("website", self.website.as_deref())
            .text_opt("address", self.address.as_deref())
    }
}

impl ApiClient {
    /// The current user's cards.
    pub async fn list_cards(&self) -> CsResult<Vec<BusinessCard>> {
        let resp = self.get("/cards").await?;
        resp.entities(&["data", "cards"])
    }

    /// One card by id.
    pub async fn card(&self, id: &str) -> CsResult<BusinessCard> {
        let resp = self.get(&format!("/cards/{}", segment(id))).await?;
        resp.entity(&["data", "card"])
    }

    /// Cards shared by the user's contacts.
    pub async fn contacts_feed(&self, page: Option<u32>) -> CsResult<Vec<BusinessCard>> {
        let path = match page {
            Some(p) => format!("/cards/feed/contacts?page={p}"),
            None => "/cards/feed/contacts".to_string(),
        };
        let resp = self.get(&path).await?;
        resp.entities(&["data", "cards", "feed"])
    }

    /// Create a card from JSON fields.
    pub async fn create_card(&self, card: &NewCard) -> CsResult<BusinessCard> {
        let resp = self
            .post("/cards", serde_json::to_value(card)?, RequestOptions::default())
            .await?;
        resp.entity(&["data", "card"])
    }

    /// Create a card with an image, sent as multipart.
    pub async fn create_card_with_image(
        &self,
        card: &NewCard,
        image: FilePart,
    ) -> CsResult<BusinessCard> {
        let form = card.to_form().file("image", image);
        let resp = self.post("/cards", form, RequestOptions::default()).await?;
        resp.entity(&["data", "card"])
    }

    /// Replace card fields.
    pub async fn update_card(&self, id: &str, changes: &serde_json::Value) -> CsResult<BusinessCard> {
        let resp = self.put(&format!("/cards/{}", segment(id)), changes.clone()).await?;
        resp.entity(&["data", "card"])
    }

    pub async fn delete_card(&self, id: &str) -> CsResult<()> {
        self.delete(&format!("/cards/{}", segment(id))).await?;
        Ok(())
    }

    /// Share a card with a phone number or user id.
    pub async fn share_card(&self, id: &str, recipient: &str) -> CsResult<()> {
        self.post(
            &format!("/cards/{}/share", segment(id)),
            json!({ "recipient": recipient }),
            RequestOptions::default(),
        )
        .await?;
        Ok(())
    }
}
