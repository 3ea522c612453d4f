//! Blind date service: escrow-backed anonymous date requests.

use chrono::{DateTime, Duration, Utc};
use lovear_common::{AppError, AppResult, Position, config::BlindDateConfig};
use lovear_store::entities::{BlindDate, BlindDateStatus, NewBlindDate};
use lovear_store::{BlindDateRepository, UserRepository};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::AccountService;

/// Blind date service for business logic.
#[derive(Clone)]
pub struct BlindDateService {
    blind_date_repo: BlindDateRepository,
    user_repo: UserRepository,
    accounts: AccountService,
    config: BlindDateConfig,
}

/// Input for raising a blind date request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlindDateInput {
    #[validate(range(min = -90.0, max = 90.0))]
    pub center_lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub center_lng: f64,

    #[validate(range(min = 0.1, max = 500.0))]
    pub radius_km: f64,

    /// Stake each participant escrows.
    pub amount: Decimal,
}

impl BlindDateService {
    /// Create a new blind date service.
    #[must_use]
    pub const fn new(
        blind_date_repo: BlindDateRepository,
        user_repo: UserRepository,
        accounts: AccountService,
        config: BlindDateConfig,
    ) -> Self {
        Self {
            blind_date_repo,
            user_repo,
            accounts,
            config,
        }
    }

    /// Raise a pending blind date request, escrowing the stake from the
    /// creator's wallet. The debit happens before the record is created, so
    /// an insufficient balance leaves no trace.
    pub async fn create(&self, user_id: &str, input: CreateBlindDateInput) -> AppResult<BlindDate> {
        input.validate()?;
        if input.amount <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Stake amount must be positive".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        let now = Utc::now();
        if user.is_suspended_at(now) {
            let until = user.suspended_until.unwrap_or(now);
            return Err(AppError::Suspended(until));
        }

        self.accounts.debit_wallet(user_id, input.amount).await?;

        let blind_date = self
            .blind_date_repo
            .create(NewBlindDate {
                user1_id: user_id.to_string(),
                center_lat: input.center_lat,
                center_lng: input.center_lng,
                radius_km: input.radius_km,
                amount: input.amount,
            })
            .await?;

        tracing::info!(blind_date_id = %blind_date.id, user_id, "Blind date request escrowed");
        Ok(blind_date)
    }

    /// Join a pending request as the second participant.
    ///
    /// The joiner escrows the same stake; the date is scheduled a fixed
    /// offset from the join instant.
    pub async fn join(&self, blind_date_id: &str, user_id: &str) -> AppResult<BlindDate> {
        let blind_date = self.blind_date_repo.get_by_id(blind_date_id).await?;

        if blind_date.user1_id == user_id {
            return Err(AppError::BadRequest(
                "Cannot join your own blind date".to_string(),
            ));
        }
        if blind_date.status != BlindDateStatus::Pending {
            return Err(AppError::Conflict(
                "Blind date is no longer open".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        let now = Utc::now();
        if user.is_suspended_at(now) {
            let until = user.suspended_until.unwrap_or(now);
            return Err(AppError::Suspended(until));
        }

        self.accounts.debit_wallet(user_id, blind_date.amount).await?;

        let scheduled_for = now + Duration::hours(self.config.schedule_offset_hours);
        let matched = self
            .blind_date_repo
            .set_matched(blind_date_id, user_id, scheduled_for)
            .await?;

        tracing::info!(
            blind_date_id,
            user1_id = %matched.user1_id,
            user2_id = user_id,
            scheduled_for = %scheduled_for,
            "Blind date matched"
        );
        Ok(matched)
    }

    /// Open requests whose search area covers the user's position.
    pub async fn nearby(&self, user_id: &str) -> AppResult<Vec<BlindDate>> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let Some(position) = user.position() else {
            return Err(AppError::BadRequest(
                "No position reported; update your location first".to_string(),
            ));
        };

        // Each request carries its own radius, so filter per record rather
        // than with a single radius query.
        let mut open = Vec::new();
        for bd in self
            .blind_date_repo
            .find_pending_within(position, f64::MAX, user_id)
            .await?
        {
            let center = Position::new(bd.center_lat, bd.center_lng);
            if lovear_common::within_radius(center, position, bd.radius_km) {
                open.push(bd);
            }
        }
        open.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(open)
    }

    /// Cancel a pending request and refund the escrowed stake. Creator only;
    /// a matched date can no longer be cancelled.
    pub async fn cancel(&self, blind_date_id: &str, user_id: &str) -> AppResult<BlindDate> {
        let blind_date = self.blind_date_repo.get_by_id(blind_date_id).await?;
        if blind_date.user1_id != user_id {
            return Err(AppError::Forbidden(
                "Only the creator can cancel a blind date".to_string(),
            ));
        }
        if blind_date.status != BlindDateStatus::Pending {
            return Err(AppError::Conflict(
                "Only a pending blind date can be cancelled".to_string(),
            ));
        }

        self.accounts.credit_wallet(user_id, blind_date.amount).await?;
        self.blind_date_repo
            .set_status(blind_date_id, BlindDateStatus::Cancelled)
            .await
    }

    /// Mark a matched date as completed. Either participant may confirm.
    /// The escrowed stakes are consumed.
    pub async fn complete(&self, blind_date_id: &str, user_id: &str) -> AppResult<BlindDate> {
        let blind_date = self.blind_date_repo.get_by_id(blind_date_id).await?;
        if !blind_date.involves(user_id) {
            return Err(AppError::Forbidden(
                "Not a participant of this blind date".to_string(),
            ));
        }
        if blind_date.status != BlindDateStatus::Matched {
            return Err(AppError::Conflict(
                "Only a matched blind date can be completed".to_string(),
            ));
        }
        self.blind_date_repo
            .set_status(blind_date_id, BlindDateStatus::Completed)
            .await
    }

    /// All blind dates involving the user.
    pub async fn for_user(&self, user_id: &str) -> AppResult<Vec<BlindDate>> {
        let mut dates = self.blind_date_repo.find_for_user(user_id).await?;
        dates.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(dates)
    }

    /// Refund requests that stayed unmatched past the refund window.
    /// Returns the number of requests expired. Called periodically by the
    /// server.
    pub async fn expire_unmatched(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let cutoff = now - Duration::hours(self.config.refund_window_hours);
        let stale = self.blind_date_repo.find_pending_older_than(cutoff).await?;

        let mut expired = 0;
        for bd in stale {
            self.accounts.credit_wallet(&bd.user1_id, bd.amount).await?;
            self.blind_date_repo
                .set_status(&bd.id, BlindDateStatus::Cancelled)
                .await?;
            tracing::info!(blind_date_id = %bd.id, user_id = %bd.user1_id, "Expired unmatched blind date, stake refunded");
            expired += 1;
        }
        Ok(expired)
    }
}
