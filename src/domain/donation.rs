//! Donation event
//!
//! One received donation notification, as held in the pending queue and as
//! handed to the polling client.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::amount::Rupiah;
use super::payload::{test_injection, webhook};

/// A donation waiting to be picked up by the poller.
///
/// Serialized as `{id, name, amount, message, timestamp}` where `timestamp`
/// is the epoch-millis time the relay received it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Donation {
    /// Deduplication key
    pub id: String,
    pub name: String,
    pub amount: Rupiah,
    pub message: String,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub received_at: DateTime<Utc>,
}

impl Donation {
    /// Build a donation from a webhook payload.
    ///
    /// Never fails: every field falls back to a default. Payloads carrying
    /// neither `id` nor `created_at` get a generated time-ordered id.
    pub fn from_webhook(payload: &Map<String, Value>) -> Self {
        let id = webhook::ID
            .text(payload)
            .unwrap_or_else(|| Uuid::now_v7().to_string());

        let amount = webhook::AMOUNT
            .first_present(payload)
            .map(Rupiah::from_json)
            .unwrap_or_default();

        Self {
            id,
            name: webhook::NAME
                .text(payload)
                .unwrap_or_else(|| webhook::DEFAULT_NAME.to_string()),
            amount,
            message: webhook::MESSAGE
                .text(payload)
                .unwrap_or_else(|| webhook::DEFAULT_MESSAGE.to_string()),
            received_at: Utc::now(),
        }
    }

    /// Build a manual test donation.
    ///
    /// The id is always freshly generated with the `test_` prefix, so test
    /// donations never collide with producer ids or with each other.
    pub fn for_test(fields: &Map<String, Value>) -> Self {
        let amount = test_injection::AMOUNT
            .first_present(fields)
            .map(Rupiah::from_json)
            .unwrap_or_else(|| Rupiah::new(test_injection::DEFAULT_AMOUNT));

        Self {
            id: format!("{}{}", test_injection::ID_PREFIX, Uuid::now_v7().simple()),
            name: test_injection::NAME
                .text(fields)
                .unwrap_or_else(|| test_injection::DEFAULT_NAME.to_string()),
            amount,
            message: test_injection::MESSAGE
                .text(fields)
                .unwrap_or_else(|| test_injection::DEFAULT_MESSAGE.to_string()),
            received_at: Utc::now(),
        }
    }
}
