use serde_json::json;

use crate::common::signer::{sign_payload, SignedPayload};
pub use crate::common::sample::sample_payload;
use crate::common::verify::SharedSecret;

pub const TEST_SECRET: &str = "whsec-test-7f3a9c2e51b84d06";

pub fn test_secret() -> SharedSecret {
    SharedSecret::new(TEST_SECRET).expect("test secret is not blank")
}

/// [`sample_payload`] serialized and signed with [`TEST_SECRET`].
pub fn signed_sample() -> SignedPayload {
    sign_payload(&sample_payload(), &test_secret()).expect("sample payload serializes")
}

/// A partially paid order with one confirmed on-chain transaction.
pub fn partial_payment_json() -> serde_json::Value {
    json!({
        "orderId": "37b93772-c3c9-4ed7-bc80-6d95308680f7",
        "status": "partial",
        "depositAddress": "bc1qvervepgggtj4wtraw2q2zg6yna3w8nevxx4sf6",
        "usdAmount": "20.00",
        "btcAmount": "0.00022004",
        "paidAmount": {
            "api": "blockstream",
            "confirmedBalance": 0.00008,
            "pendingBalance": 0,
            "totalReceived": 0.00008,
            "totalSpent": 0,
            "unconfirmedTxCount": 0,
            "availableBalance": 0.00008,
            "hasPendingTransactions": false
        },
        "createdAt": "2025-04-22T17:08:36.422Z",
        "updatedAt": "2025-04-22T17:32:01.629Z",
        "statusMessage": "La orden está parcialmente pagada (36.36%)",
        "warningMessage": "Falta por pagar 0.00014004 BTC (63.64%)",
        "paidPercentage": "36.36",
        "remainingAmount": "0.00014004",
        "transactionDetails": [
            {
                "transactionHash": "65627cace5a7cf3864773cf9ffa5e0620adee6ce802ba9865b00135477c69956",
                "amount": 0.00008,
                "timestamp": "2025-04-22T17:31:51.000Z",
                "status": "completed",
                "confirmations": 1,
                "blockHeight": 893536
            }
        ],
        "transactions": [
            {
                "hash": null,
                "amount": 0.00008,
                "timestamp": "2025-04-22T17:32:01.628Z",
                "status": "partial"
            }
        ],
        "currentBalance": 0.00008,
        "requiredAmount": 0.00022004
    })
}

/// Signs arbitrary bytes with [`TEST_SECRET`].
pub fn sign_raw(body: &[u8]) -> String {
    crate::common::signer::compute_signature(&test_secret(), body)
}
