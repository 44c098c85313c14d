//! `sendTransaction` payload.

use serde::Serialize;

use crate::domain::shared::InstrumentCode;
use crate::domain::trading::Limit;

/// QUIK transaction. Every value is a string; empty ones are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transaction {
    #[serde(rename = "TRANS_ID", skip_serializing_if = "String::is_empty")]
    pub trans_id: String,
    #[serde(rename = "ACCOUNT", skip_serializing_if = "String::is_empty")]
    pub account: String,
    #[serde(rename = "TYPE", skip_serializing_if = "String::is_empty")]
    pub order_type: String,
    #[serde(rename = "ACTION", skip_serializing_if = "String::is_empty")]
    pub action: String,
    #[serde(rename = "CLASSCODE", skip_serializing_if = "String::is_empty")]
    pub class_code: String,
    #[serde(rename = "SECCODE", skip_serializing_if = "String::is_empty")]
    pub sec_code: String,
    #[serde(rename = "OPERATION", skip_serializing_if = "String::is_empty")]
    pub operation: String,
    #[serde(rename = "PRICE", skip_serializing_if = "String::is_empty")]
    pub price: String,
    #[serde(rename = "QUANTITY", skip_serializing_if = "String::is_empty")]
    pub quantity: String,
}

impl Transaction {
    /// New buy limit order.
    #[must_use]
    pub fn buy_limit(
        trans_id: u64,
        account: &str,
        class_code: &str,
        sec_code: &InstrumentCode,
        limit: &Limit,
    ) -> Self {
        Self {
            trans_id: trans_id.to_string(),
            account: account.to_string(),
            order_type: "L".to_string(),
            action: "NEW_ORDER".to_string(),
            class_code: class_code.to_string(),
            sec_code: sec_code.to_string(),
            operation: "B".to_string(),
            price: limit.price_text(),
            quantity: limit.lots().to_string(),
        }
    }
}
