//! Ad endpoints and the footer carousel's resume position.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cs_core::constants::keys;
use cs_core::error::CsResult;
use cs_store::KeyValueStore;

use crate::body::{FilePart, MultipartForm};
use crate::client::{ApiClient, RequestOptions};
use crate::response::{flexible_id, Entity};

/// Uploads get more time than ordinary calls.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub status: Option<String>,
}

impl Entity for Ad {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("_id", "id"), ("image", "imageUrl"), ("url", "link")];
}

/// An ad submitted for review.
#[derive(Debug, Clone)]
pub struct AdSubmission {
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl ApiClient {
    /// Ads currently running.
    pub async fn active_ads(&self) -> CsResult<Vec<Ad>> {
        let resp = self.get("/ads/active").await?;
        resp.entities(&["data", "ads"])
    }

    /// Submit an ad with its creative for review.
    pub async fn submit_ad(&self, ad: &AdSubmission, image: FilePart) -> CsResult<Ad> {
        let form = MultipartForm::new()
            .text("title", ad.title.as_str())
            .text_opt("link", ad.link.as_deref())
            .text_opt("description", ad.description.as_deref())
            .file("image", image);
        let resp = self
            .post(
                "/ads/submit",
                form,
                RequestOptions::default().with_timeout(UPLOAD_TIMEOUT),
            )
            .await?;
        resp.entity(&["data", "ad"])
    }
}

/// Remembers which ad the carousel showed last so it resumes there.
pub struct AdRotation<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> AdRotation<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Index to show first for `count` ads. Out-of-range or unreadable
    /// positions restart at 0.
    pub fn resume_index(&self, count: usize) -> CsResult<usize> {
        if count == 0 {
            return Ok(0);
        }
        let stored = self
            .store
            .get(keys::LAST_AD_INDEX)?
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(0);
        Ok(if stored < count { stored } else { 0 })
    }

    /// Move to the next ad, wrapping around, and persist the position.
    pub fn advance(&self, count: usize) -> CsResult<usize> {
        if count == 0 {
            return Ok(0);
        }
        let next = (self.resume_index(count)? + 1) % count;
        self.store.set(keys::LAST_AD_INDEX, &next.to_string())?;
        Ok(next)
    }
}
