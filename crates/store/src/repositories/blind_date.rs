//! Blind date repository.

use crate::MemStore;
use crate::entities::blind_date::{BlindDate, BlindDateStatus, NewBlindDate};
use chrono::{DateTime, Utc};
use lovear_common::{AppError, AppResult, Position, within_radius};
use std::sync::Arc;

/// Repository for blind date operations.
#[derive(Debug, Clone)]
pub struct BlindDateRepository {
    store: Arc<MemStore>,
}

impl BlindDateRepository {
    /// Create a new blind date repository.
    #[must_use]
    pub const fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// Create a pending blind date request.
    pub async fn create(&self, new: NewBlindDate) -> AppResult<BlindDate> {
        let mut blind_dates = self.store.blind_dates.write().await;

        let blind_date = BlindDate {
            id: self.store.next_id(),
            user1_id: new.user1_id,
            user2_id: None,
            center_lat: new.center_lat,
            center_lng: new.center_lng,
            radius_km: new.radius_km,
            amount: new.amount,
            status: BlindDateStatus::Pending,
            scheduled_for: None,
            created_at: Utc::now(),
        };

        blind_dates.insert(blind_date.id.clone(), blind_date.clone());
        Ok(blind_date)
    }

    /// Find a blind date by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<BlindDate>> {
        Ok(self.store.blind_dates.read().await.get(id).cloned())
    }

    /// Get a blind date by ID, erroring when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<BlindDate> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blind date {id}")))
    }

    /// Transition a pending request to matched.
    pub async fn set_matched(
        &self,
        id: &str,
        user2_id: &str,
        scheduled_for: DateTime<Utc>,
    ) -> AppResult<BlindDate> {
        let mut blind_dates = self.store.blind_dates.write().await;
        let blind_date = blind_dates
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Blind date {id}")))?;
        blind_date.user2_id = Some(user2_id.to_string());
        blind_date.status = BlindDateStatus::Matched;
        blind_date.scheduled_for = Some(scheduled_for);
        Ok(blind_date.clone())
    }

    /// Set the lifecycle status.
    pub async fn set_status(&self, id: &str, status: BlindDateStatus) -> AppResult<BlindDate> {
        let mut blind_dates = self.store.blind_dates.write().await;
        let blind_date = blind_dates
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Blind date {id}")))?;
        blind_date.status = status;
        Ok(blind_date.clone())
    }

    /// Pending requests whose center lies within `radius_km` of `center`,
    /// excluding those raised by `exclude_user`.
    pub async fn find_pending_within(
        &self,
        center: Position,
        radius_km: f64,
        exclude_user: &str,
    ) -> AppResult<Vec<BlindDate>> {
        Ok(self
            .store
            .blind_dates
            .read()
            .await
            .values()
            .filter(|bd| bd.status == BlindDateStatus::Pending && bd.user1_id != exclude_user)
            .filter(|bd| {
                within_radius(
                    center,
                    Position::new(bd.center_lat, bd.center_lng),
                    radius_km,
                )
            })
            .cloned()
            .collect())
    }

    /// Pending requests created before `cutoff` (expiry-refund candidates).
    pub async fn find_pending_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<BlindDate>> {
        Ok(self
            .store
            .blind_dates
            .read()
            .await
            .values()
            .filter(|bd| bd.status == BlindDateStatus::Pending && bd.created_at < cutoff)
            .cloned()
            .collect())
    }

    /// All blind dates involving a user.
    pub async fn find_for_user(&self, user_id: &str) -> AppResult<Vec<BlindDate>> {
        Ok(self
            .store
            .blind_dates
            .read()
            .await
            .values()
            .filter(|bd| bd.involves(user_id))
            .cloned()
            .collect())
    }
}
