//! User repository.

use crate::MemStore;
use crate::entities::user::{NewUser, User, UserPatch};
use chrono::{DateTime, Utc};
use lovear_common::{AppError, AppResult, Position, within_radius};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Repository for user operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    store: Arc<MemStore>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// Create a new user with registration-time defaults.
    pub async fn create(&self, new: NewUser) -> AppResult<User> {
        let mut users = self.store.users.write().await;

        let user = User {
            id: self.store.next_id(),
            username_lower: new.username.to_lowercase(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            token: new.token,
            display_name: new.display_name,
            bio: None,
            gender: new.gender,
            looking_for: new.looking_for,
            age: new.age,
            age_min: new.age_min,
            age_max: new.age_max,
            max_distance_km: new.max_distance_km,
            latitude: None,
            longitude: None,
            wallet_balance: Decimal::ZERO,
            suspended_until: None,
            is_premium: false,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: None,
        };

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.store.users.read().await.get(id).cloned())
    }

    /// Get a user by ID, erroring when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let needle = username.to_lowercase();
        Ok(self
            .store
            .users
            .read()
            .await
            .values()
            .find(|u| u.username_lower == needle)
            .cloned())
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let needle = email.to_lowercase();
        Ok(self
            .store
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.to_lowercase() == needle)
            .cloned())
    }

    /// Find a user by access token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<User>> {
        Ok(self
            .store
            .users
            .read()
            .await
            .values()
            .find(|u| u.token == token)
            .cloned())
    }

    /// Apply a profile patch field-by-field over the stored user.
    pub async fn update(&self, id: &str, patch: UserPatch) -> AppResult<User> {
        let mut users = self.store.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;

        if let Some(display_name) = patch.display_name {
            user.display_name = display_name;
        }
        if let Some(bio) = patch.bio {
            user.bio = bio;
        }
        if let Some(looking_for) = patch.looking_for {
            user.looking_for = looking_for;
        }
        if let Some(age_min) = patch.age_min {
            user.age_min = age_min;
        }
        if let Some(age_max) = patch.age_max {
            user.age_max = age_max;
        }
        if let Some(max_distance_km) = patch.max_distance_km {
            user.max_distance_km = max_distance_km;
        }
        user.updated_at = Some(Utc::now());

        Ok(user.clone())
    }

    /// Set the user's last reported position.
    pub async fn set_position(&self, id: &str, latitude: f64, longitude: f64) -> AppResult<User> {
        let mut users = self.store.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;
        user.latitude = Some(latitude);
        user.longitude = Some(longitude);
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    /// Overwrite the wallet balance. Callers are responsible for checking
    /// sufficiency before a debit; this layer does not validate.
    pub async fn set_wallet_balance(&self, id: &str, balance: Decimal) -> AppResult<User> {
        let mut users = self.store.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;
        user.wallet_balance = balance;
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    /// Set or clear the suspension window.
    pub async fn set_suspended_until(
        &self,
        id: &str,
        until: Option<DateTime<Utc>>,
    ) -> AppResult<User> {
        let mut users = self.store.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;
        user.suspended_until = until;
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    /// Set the premium flag.
    pub async fn set_premium(&self, id: &str, is_premium: bool) -> AppResult<User> {
        let mut users = self.store.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;
        user.is_premium = is_premium;
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    /// Users with a reported position within `radius_km` of `center`, under
    /// the planar approximation.
    pub async fn find_nearby(&self, center: Position, radius_km: f64) -> AppResult<Vec<User>> {
        Ok(self
            .store
            .users
            .read()
            .await
            .values()
            .filter(|u| {
                u.position()
                    .is_some_and(|p| within_radius(center, p, radius_km))
            })
            .cloned()
            .collect())
    }
}
