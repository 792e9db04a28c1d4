//! Credits ledger endpoints.
//!
//! Transfers move value, so they use the default policy: retried only when
//! the connection was never established.

use serde::{Deserialize, Serialize};
use serde_json::json;

use cs_core::error::{CsError, CsResult};

use crate::client::{ApiClient, RequestOptions};
use crate::response::{flexible_id, flexible_number, Entity};

/// Current credit balance. The backend has sent it as an integer, a float
/// and a numeric string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditBalance {
    #[serde(default, deserialize_with = "flexible_number")]
    pub credits: Option<f64>,
}

impl Entity for CreditBalance {
    const ALIASES: &'static [(&'static str, &'static str)] = &[("balance", "credits")];
}

/// Result of a transfer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    #[serde(default, deserialize_with = "flexible_number")]
    pub new_balance: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Entity for TransferReceipt {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("balance", "newBalance"), ("credits", "newBalance")];
}

/// One ledger entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransaction {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "flexible_number")]
    pub amount: Option<f64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for CreditTransaction {}

impl ApiClient {
    /// Current balance (`{ credits }` or `{ data: { credits } }`).
    pub async fn credit_balance(&self) -> CsResult<CreditBalance> {
        let resp = self.get("/credits/balance").await?;
        resp.entity(&["data"])
    }

    /// Send credits to another user by phone number.
    pub async fn transfer_credits(
        &self,
        recipient_phone: &str,
        amount: i64,
        note: Option<&str>,
    ) -> CsResult<TransferReceipt> {
        if amount <= 0 {
            return Err(CsError::InvalidRequest(format!(
                "transfer amount must be positive, got {amount}"
            )));
        }
        let resp = self
            .post(
                "/credits/transfer",
                json!({
                    "recipientPhone": recipient_phone,
                    "amount": amount,
                    "note": note,
                }),
                RequestOptions::default(),
            )
            .await?;
        resp.entity(&["data"])
    }

    /// Ledger history, newest first as the backend orders it.
    pub async fn credit_history(&self) -> CsResult<Vec<CreditTransaction>> {
        let resp = self.get("/credits/history").await?;
        resp.entities(&["data", "transactions", "history"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_alias() {
        let b = CreditBalance::from_value(serde_json::json!({"success": true, "balance": 12})).unwrap();
        assert_eq!(b.credits, Some(12.0));
    }

    #[test]
    fn test_balance_accepts_float_and_string() {
        let b = CreditBalance::from_value(serde_json::json!({"credits": 450.5})).unwrap();
        assert_eq!(b.credits, Some(450.5));
        let b = CreditBalance::from_value(serde_json::json!({"credits": "75"})).unwrap();
        assert_eq!(b.credits, Some(75.0));
        let b = CreditBalance::from_value(serde_json::json!({"success": true})).unwrap();
        assert!(b.credits.is_none());
    }

    #[test]
    fn test_transaction_deserialize() {
        let t = CreditTransaction::from_value(serde_json::json!({
            "_id": "tx1",
            "amount": -50,
            "type": "transfer",
            "createdAt": "2026-01-02T03:04:05Z"
        }))
        .unwrap();
        assert_eq!(t.kind.as_deref(), Some("transfer"));
        assert_eq!(t.amount, Some(-50.0));
        assert!(t.description.is_none());
    }

    #[test]
    fn test_transaction_without_amount() {
        let t = CreditTransaction::from_value(serde_json::json!({"_id": "t1", "type": "bonus"}))
            .unwrap();
        assert_eq!(t.id.as_deref(), Some("t1"));
        assert!(t.amount.is_none());
    }
}
