//! Voucher purchase and redemption endpoints.
//!
//! Redemption rules and referral payouts are computed server-side; the
//! client only relays the request and the outcome.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use cs_core::error::CsResult;

use crate::client::{ApiClient, RequestOptions};
use crate::endpoints::segment;
use crate::response::{flexible_bool, flexible_id, flexible_number, fold_aliases, Entity};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Price in credits.
    #[serde(default, deserialize_with = "flexible_number")]
    pub price: Option<f64>,
    /// Face value in the merchant's currency.
    #[serde(default, deserialize_with = "flexible_number")]
    pub value: Option<f64>,
    pub code: Option<String>,
    pub status: Option<String>,
    pub expires_at: Option<String>,
}

impl Entity for Voucher {}

/// Outcome of a purchase or redemption.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherOutcome {
    #[serde(default, deserialize_with = "flexible_bool")]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub voucher: Option<Voucher>,
    #[serde(default, deserialize_with = "flexible_number")]
    pub remaining_credits: Option<f64>,
}

impl Entity for VoucherOutcome {
    const ALIASES: &'static [(&'static str, &'static str)] = &[("balance", "remainingCredits")];

    fn canonicalize(value: &mut Value) {
        fold_aliases(value, Self::ALIASES);
        if let Some(voucher) = value.get_mut("voucher") {
            Voucher::canonicalize(voucher);
        }
    }
}

impl ApiClient {
    /// Vouchers available to buy plus the ones the user owns.
    pub async fn vouchers(&self) -> CsResult<Vec<Voucher>> {
        let resp = self.get("/vouchers").await?;
        resp.entities(&["data", "vouchers"])
    }

    /// Buy a voucher with credits.
    pub async fn purchase_voucher(&self, id: &str) -> CsResult<VoucherOutcome> {
        let resp = self
            .post(
                &format!("/vouchers/{}/purchase", segment(id)),
                json!({}),
                RequestOptions::default(),
            )
            .await?;
        resp.entity(&["data"])
    }

    /// Redeem a voucher code.
    pub async fn redeem_voucher(&self, code: &str) -> CsResult<VoucherOutcome> {
        let resp = self
            .post(
                "/vouchers/redeem",
                json!({ "code": code }),
                RequestOptions::default(),
            )
            .await?;
        resp.entity(&["data"])
    }
}
