//! Example order notification used by the `sender` binary and the tests.

use chrono::{DateTime, Utc};

use crate::common::types::{OrderStatusPayload, PaidAmount};

fn timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// A freshly created order awaiting payment.
pub fn sample_payload() -> OrderStatusPayload {
    OrderStatusPayload {
        order_id: Some("da8972b7-6471-4a8d-a05a-1bdfafeadfa4".to_string()),
        status: Some("pending".to_string()),
        deposit_address: Some("bc1qz5lmrumd8utptrkld6vm36625qfnrdedk52cvh".to_string()),
        usd_amount: Some("10.00".to_string()),
        btc_amount: Some("0.00010718".to_string()),
        paid_amount: Some(PaidAmount {
            api: Some("blockstream".to_string()),
            confirmed_balance: Some(0.0),
            pending_balance: Some(0.0),
            total_received: Some(0.0),
            total_spent: Some(0.0),
            unconfirmed_tx_count: Some(0),
            available_balance: Some(0.0),
            has_pending_transactions: Some(false),
        }),
        created_at: timestamp("2025-04-24T01:38:51.179Z"),
        updated_at: timestamp("2025-04-24T02:09:01.405Z"),
        status_message: Some("La orden está pendiente de pago".to_string()),
        warning_message: None,
        paid_percentage: Some("0.00".to_string()),
        remaining_amount: Some("0.00010718".to_string()),
        transaction_details: Some(Vec::new()),
        ..OrderStatusPayload::default()
    }
}
