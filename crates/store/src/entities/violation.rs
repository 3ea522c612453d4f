//! Violation entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category of a recorded moderation infraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    PhoneNumber,
    Inappropriate,
    Harassment,
    Spam,
    PersonalInfo,
}

/// Violation status. Resolved by paying the associated fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStatus {
    #[default]
    Pending,
    FinePaid,
    Waived,
}

/// Violation model. Created alongside a forced suspension when moderation
/// detects an infraction in outbound content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    /// The offending user.
    pub user_id: String,
    /// The reporting user; None when raised by the automatic filter.
    pub reporter_id: Option<String>,
    pub violation_type: ViolationType,
    pub fine_amount: Decimal,
    pub status: ViolationStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a violation.
#[derive(Debug, Clone)]
pub struct NewViolation {
    pub user_id: String,
    pub reporter_id: Option<String>,
    pub violation_type: ViolationType,
    pub fine_amount: Decimal,
}
