//! Account service: registration, login and profile management.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use lovear_common::{AppError, AppResult, IdGenerator};
use lovear_store::UserRepository;
use lovear_store::entities::{Gender, LookingFor, NewUser, User, UserPatch};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 128))]
    pub display_name: Option<String>,

    pub gender: Gender,

    #[serde(default)]
    pub looking_for: LookingFor,

    #[validate(range(min = 18, max = 120))]
    pub age: i32,

    #[validate(range(min = 18, max = 120))]
    #[serde(default = "default_age_min")]
    pub age_min: i32,

    #[validate(range(min = 18, max = 120))]
    #[serde(default = "default_age_max")]
    pub age_max: i32,

    #[validate(range(min = 1.0, max = 20000.0))]
    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,
}

const fn default_age_min() -> i32 {
    18
}

const fn default_age_max() -> i32 {
    99
}

const fn default_max_distance_km() -> f64 {
    50.0
}

/// Input for updating a profile.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(max = 128))]
    pub display_name: Option<String>,

    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    pub looking_for: Option<LookingFor>,

    #[validate(range(min = 18, max = 120))]
    pub age_min: Option<i32>,

    #[validate(range(min = 18, max = 120))]
    pub age_max: Option<i32>,

    #[validate(range(min = 1.0, max = 20000.0))]
    pub max_distance_km: Option<f64>,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account.
    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        input.validate()?;

        if input.age_min > input.age_max {
            return Err(AppError::BadRequest(
                "age_min cannot exceed age_max".to_string(),
            ));
        }
        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let token = self.id_gen.generate_token();

        let user = self
            .user_repo
            .create(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                token,
                display_name: input.display_name,
                gender: input.gender,
                looking_for: input.looking_for,
                age: input.age,
                age_min: input.age_min,
                age_max: input.age_max,
                max_distance_km: input.max_distance_km,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Registered new account");
        Ok(user)
    }

    /// Log in with username (or email) and password.
    ///
    /// Both unknown accounts and wrong passwords surface as the same
    /// `Unauthorized` error.
    pub async fn login(&self, username_or_email: &str, password: &str) -> AppResult<User> {
        let user = match self.user_repo.find_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => self.user_repo.find_by_email(username_or_email).await?,
        };
        let Some(user) = user else {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }
        Ok(user)
    }

    /// Resolve a bearer token to its account.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<User> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))
    }

    /// Fetch a profile by ID.
    pub async fn profile(&self, user_id: &str) -> AppResult<User> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Update profile fields. Absent fields are left untouched.
    pub async fn update_profile(&self, user_id: &str, input: UpdateProfileInput) -> AppResult<User> {
        input.validate()?;

        self.user_repo
            .update(
                user_id,
                UserPatch {
                    display_name: input.display_name.map(Some),
                    bio: input.bio.map(Some),
                    looking_for: input.looking_for,
                    age_min: input.age_min,
                    age_max: input.age_max,
                    max_distance_km: input.max_distance_km,
                },
            )
            .await
    }

    /// Record the user's last reported position.
    pub async fn update_position(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<User> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::BadRequest(
                "Coordinates out of range".to_string(),
            ));
        }
        self.user_repo.set_position(user_id, latitude, longitude).await
    }

    /// Credit the wallet.
    pub async fn credit_wallet(&self, user_id: &str, amount: Decimal) -> AppResult<User> {
        if amount <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Credit amount must be positive".to_string(),
            ));
        }
        let user = self.user_repo.get_by_id(user_id).await?;
        self.user_repo
            .set_wallet_balance(user_id, user.wallet_balance + amount)
            .await
    }

    /// Debit the wallet, refusing to go below zero.
    pub async fn debit_wallet(&self, user_id: &str, amount: Decimal) -> AppResult<User> {
        if amount <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Debit amount must be positive".to_string(),
            ));
        }
        let user = self.user_repo.get_by_id(user_id).await?;
        if user.wallet_balance < amount {
            return Err(AppError::InsufficientFunds {
                balance: user.wallet_balance,
                required: amount,
            });
        }
        self.user_repo
            .set_wallet_balance(user_id, user.wallet_balance - amount)
            .await
    }

    /// Suspend an account until the given instant.
    pub async fn suspend_until(&self, user_id: &str, until: DateTime<Utc>) -> AppResult<User> {
        self.user_repo.set_suspended_until(user_id, Some(until)).await
    }

    /// Lift a suspension.
    pub async fn lift_suspension(&self, user_id: &str) -> AppResult<User> {
        self.user_repo.set_suspended_until(user_id, None).await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
