use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const ACK_MESSAGE: &str = "Webhook procesado correctamente";

/// Deepest array/object nesting accepted in a webhook body.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Order status notification as sent by the payment processor.
///
/// Every field is optional. Decoding through [`OrderStatusPayload::from_value`]
/// is total: a field holding the wrong JSON type is treated as absent, and a
/// document that is not an object yields the empty record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub deposit_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub usd_amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub btc_amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_record")]
    pub paid_amount: Option<PaidAmount>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub status_message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub warning_message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub paid_percentage: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub remaining_amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub transaction_details: Option<Vec<TransactionDetail>>,
    #[serde(
        default,
        deserialize_with = "lenient_records",
        skip_serializing_if = "Option::is_none"
    )]
    pub transactions: Option<Vec<TransactionRecord>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_balance: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub required_amount: Option<f64>,
}

impl OrderStatusPayload {
    /// Decodes an already-parsed JSON document.
    ///
    /// Only objects carry named fields. Arrays are not read positionally.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Parses a raw body. Any syntactically valid document up to
    /// [`MAX_NESTING_DEPTH`] levels decodes; numbers keep their source text,
    /// so values outside the `f64` range are not a syntax error.
    pub fn parse(raw: &[u8]) -> Result<Self, serde_json::Error> {
        if nesting_exceeds(raw, MAX_NESTING_DEPTH) {
            return Err(serde::de::Error::custom(format!(
                "nesting depth exceeds {MAX_NESTING_DEPTH}"
            )));
        }

        let mut de = serde_json::Deserializer::from_slice(raw);
        de.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;

        Ok(Self::from_value(value))
    }

    pub fn order_status(&self) -> Option<OrderStatus> {
        self.status.as_deref().map(OrderStatus::from)
    }
}

/// Balance snapshot of the deposit address at notification time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidAmount {
    #[serde(default, deserialize_with = "lenient")]
    pub api: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub confirmed_balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pending_balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_received: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_spent: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub unconfirmed_tx_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub available_balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub has_pending_transactions: Option<bool>,
}

/// On-chain transaction credited to the order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    #[serde(default, deserialize_with = "lenient")]
    pub transaction_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub confirmations: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub block_height: Option<u64>,
}

/// Processor-side ledger entry; `hash` stays null until the payment is seen on chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Partial,
    Completed,
    Other(String),
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending" => OrderStatus::Pending,
            "partial" => OrderStatus::Partial,
            "completed" => OrderStatus::Completed,
            other => OrderStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => f.write_str("pending"),
            OrderStatus::Partial => f.write_str("partial"),
            OrderStatus::Completed => f.write_str("completed"),
            OrderStatus::Other(other) => f.write_str(other),
        }
    }
}

/// Body of a 200 response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub usd_amount: Option<String>,
    pub btc_amount: Option<String>,
}

impl From<&OrderStatusPayload> for WebhookAck {
    fn from(payload: &OrderStatusPayload) -> Self {
        Self {
            success: true,
            message: ACK_MESSAGE.to_string(),
            order_id: payload.order_id.clone(),
            status: payload.status.clone(),
            usd_amount: payload.usd_amount.clone(),
            btc_amount: payload.btc_amount.clone(),
        }
    }
}

/// Body of every rejection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// Records are only read from objects, never positionally from arrays.
fn record_from_value<T>(value: Value) -> Option<T>
where
    T: DeserializeOwned,
{
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

fn lenient_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(record_from_value(Value::deserialize(deserializer)?))
}

// A list entry that is not an object keeps its slot as an empty record.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| record_from_value(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

fn nesting_exceeds(raw: &[u8], limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &b in raw {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

// Echoed amounts and identifiers: numbers are kept as their decimal text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use serde_json::json;

    #[test]
    fn test_decode_full_partial_payment() {
        let payload = OrderStatusPayload::from_value(test_utils::partial_payment_json());

        assert_eq!(
            payload.order_id.as_deref(),
            Some("37b93772-c3c9-4ed7-bc80-6d95308680f7")
        );
        assert_eq!(payload.order_status(), Some(OrderStatus::Partial));
        assert_eq!(
            payload.warning_message.as_deref(),
            Some("Falta por pagar 0.00014004 BTC (63.64%)")
        );

        let paid = payload.paid_amount.unwrap();
        assert_eq!(paid.api.as_deref(), Some("blockstream"));
        assert_eq!(paid.confirmed_balance, Some(0.00008));
        assert_eq!(paid.has_pending_transactions, Some(false));

        let details = payload.transaction_details.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].confirmations, Some(1));
        assert_eq!(details[0].block_height, Some(893536));
        assert!(details[0].timestamp.is_some());

        let records = payload.transactions.unwrap();
        assert_eq!(records[0].hash, None);
        assert_eq!(records[0].status.as_deref(), Some("partial"));
        assert_eq!(payload.required_amount, Some(0.00022004));
    }

    #[test]
    fn test_decode_non_object_is_empty() {
        for value in [
            json!([1, 2]),
            json!(["da8972b7", "completed", null, "10.00", "0.1"]),
            json!("text"),
            json!(42),
            json!(null),
            json!(true),
        ] {
            assert_eq!(OrderStatusPayload::from_value(value), OrderStatusPayload::default());
        }
    }

    #[test]
    fn test_decode_wrong_types_become_none() {
        let payload = OrderStatusPayload::from_value(json!({
            "orderId": {"nested": true},
            "status": "pending",
            "paidAmount": "not an object",
            "createdAt": "yesterday",
            "transactionDetails": 7,
            "warningMessage": null
        }));

        assert_eq!(payload.order_id, None);
        assert_eq!(payload.status.as_deref(), Some("pending"));
        assert_eq!(payload.paid_amount, None);
        assert_eq!(payload.created_at, None);
        assert_eq!(payload.transaction_details, None);
        assert_eq!(payload.warning_message, None);
    }

    #[test]
    fn test_numeric_amounts_echoed_as_text() {
        let payload = OrderStatusPayload::from_value(json!({
            "usdAmount": 10,
            "btcAmount": 0.5
        }));

        assert_eq!(payload.usd_amount.as_deref(), Some("10"));
        assert_eq!(payload.btc_amount.as_deref(), Some("0.5"));
    }

    #[test]
    fn test_nested_records_ignore_arrays() {
        let payload = OrderStatusPayload::from_value(json!({
            "paidAmount": ["blockstream", 1.0, 2.0],
            "transactionDetails": [
                ["65627cace5", 0.00008],
                {"transactionHash": "abc", "confirmations": 3}
            ]
        }));

        assert_eq!(payload.paid_amount, None);
        let details = payload.transaction_details.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0], TransactionDetail::default());
        assert_eq!(details[1].transaction_hash.as_deref(), Some("abc"));
        assert_eq!(details[1].confirmations, Some(3));
    }

    #[test]
    fn test_parse_deep_nesting_up_to_limit() {
        let nested = |depth: usize| {
            format!(
                "{{\"orderId\":\"x\",\"n\":{}{}}}",
                "[".repeat(depth - 1),
                "]".repeat(depth - 1)
            )
        };

        let payload = OrderStatusPayload::parse(nested(200).as_bytes()).unwrap();
        assert_eq!(payload.order_id.as_deref(), Some("x"));
        assert!(OrderStatusPayload::parse(nested(MAX_NESTING_DEPTH).as_bytes()).is_ok());
        assert!(OrderStatusPayload::parse(nested(MAX_NESTING_DEPTH + 1).as_bytes()).is_err());
    }

    #[test]
    fn test_nesting_ignores_brackets_in_strings() {
        let body = format!("{{\"statusMessage\":\"{}\\\"]\"}}", "[".repeat(600));
        assert!(!nesting_exceeds(body.as_bytes(), MAX_NESTING_DEPTH));

        let payload = OrderStatusPayload::parse(body.as_bytes()).unwrap();
        assert!(payload.status_message.unwrap().starts_with("[["));
    }

    #[test]
    fn test_parse_out_of_range_number() {
        let payload =
            OrderStatusPayload::parse(br#"{"orderId":"x","currentBalance":1e400,"usdAmount":1e400}"#)
                .unwrap();

        assert_eq!(payload.order_id.as_deref(), Some("x"));
        assert_eq!(payload.usd_amount.as_deref(), Some("1e400"));
    }

    #[test]
    fn test_parse_rejects_trailing_data() {
        assert!(OrderStatusPayload::parse(br#"{"a":1}}"#).is_err());
        assert!(OrderStatusPayload::parse(b"").is_err());
    }

    #[test]
    fn test_order_status_parsing() {
        assert_eq!(OrderStatus::from("completed"), OrderStatus::Completed);
        assert_eq!(
            OrderStatus::from("expired"),
            OrderStatus::Other("expired".to_string())
        );
        assert_eq!(OrderStatus::from("expired").to_string(), "expired");
    }

    #[test]
    fn test_ack_serializes_explicit_nulls() {
        let ack = WebhookAck::from(&OrderStatusPayload::default());
        let value = serde_json::to_value(&ack).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "Webhook procesado correctamente",
                "orderId": null,
                "status": null,
                "usdAmount": null,
                "btcAmount": null
            })
        );
    }
}
