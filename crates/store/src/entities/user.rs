//! User entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Self-declared gender of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
}

/// Gender preference for discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LookingFor {
    Male,
    Female,
    /// Matches any gender.
    #[default]
    Both,
}

impl LookingFor {
    /// Whether a candidate of the given gender satisfies this preference.
    #[must_use]
    pub const fn accepts(self, gender: Gender) -> bool {
        match self {
            Self::Both => true,
            Self::Male => matches!(gender, Gender::Male),
            Self::Female => matches!(gender, Gender::Female),
        }
    }
}

/// User model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    /// Unique handle.
    pub username: String,

    /// Lowercased shadow of `username` for case-insensitive lookup.
    pub username_lower: String,

    /// Unique email address.
    pub email: String,

    /// Argon2 password hash.
    pub password_hash: String,

    /// Opaque access token.
    pub token: String,

    /// Display name shown on the profile.
    pub display_name: Option<String>,

    /// Profile bio.
    pub bio: Option<String>,

    pub gender: Gender,

    /// Gender preference for discovery.
    pub looking_for: LookingFor,

    /// Age in years.
    pub age: i32,

    /// Lower bound of the preferred candidate age range.
    pub age_min: i32,

    /// Upper bound of the preferred candidate age range.
    pub age_max: i32,

    /// Discovery radius in kilometers.
    pub max_distance_km: f64,

    /// Last reported latitude (None until the client reports a position).
    pub latitude: Option<f64>,

    /// Last reported longitude.
    pub longitude: Option<f64>,

    /// Wallet balance; never negative after a successful debit.
    pub wallet_balance: Decimal,

    /// When a moderation suspension lifts (None = not suspended).
    pub suspended_until: Option<DateTime<Utc>>,

    pub is_premium: bool,

    pub is_verified: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the account is suspended at `now`.
    #[must_use]
    pub fn is_suspended_at(&self, now: DateTime<Utc>) -> bool {
        self.suspended_until.is_some_and(|until| until > now)
    }

    /// The user's reported position, if any.
    #[must_use]
    pub fn position(&self) -> Option<lovear_common::Position> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(lovear_common::Position::new(lat, lng)),
            _ => None,
        }
    }
}

/// Input for creating a user. Registration-time defaults (zero wallet, no
/// premium, unverified, no suspension) are applied by the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub token: String,
    pub display_name: Option<String>,
    pub gender: Gender,
    pub looking_for: LookingFor,
    pub age: i32,
    pub age_min: i32,
    pub age_max: i32,
    pub max_distance_km: f64,
}

/// Partial update applied field-by-field over a stored user.
///
/// Only the profile fields a user may edit are present; wallet, suspension
/// and flag mutations go through dedicated repository operations.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub display_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub looking_for: Option<LookingFor>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub max_distance_km: Option<f64>,
}
