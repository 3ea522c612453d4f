//! Payment entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What the payment is for. Completion applies exactly one effect per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Premium,
    BlindDate,
    WalletTopup,
    Fine,
}

/// Payment settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Payment model. Created pending; settled exactly once by the idempotent
/// settlement handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    /// The violation a fine payment resolves (Fine type only).
    pub violation_id: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

/// Input for creating a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: String,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub violation_id: Option<String>,
}
