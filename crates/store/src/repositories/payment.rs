//! Payment repository.

use crate::MemStore;
use crate::entities::payment::{NewPayment, Payment, PaymentStatus};
use chrono::Utc;
use lovear_common::{AppError, AppResult};
use std::sync::Arc;

/// Repository for payment records.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    store: Arc<MemStore>,
}

impl PaymentRepository {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// Create a pending payment.
    pub async fn create(&self, new: NewPayment) -> AppResult<Payment> {
        let mut payments = self.store.payments.write().await;

        let payment = Payment {
            id: self.store.next_id(),
            user_id: new.user_id,
            amount: new.amount,
            payment_type: new.payment_type,
            violation_id: new.violation_id,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
            settled_at: None,
        };

        payments.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    /// Find a payment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Payment>> {
        Ok(self.store.payments.read().await.get(id).cloned())
    }

    /// Get a payment by ID, erroring when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Payment> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payment {id}")))
    }

    /// All payments made by a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Payment>> {
        let mut found: Vec<Payment> = self
            .store
            .payments
            .read()
            .await
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(found)
    }

    /// Settle a payment exactly once.
    ///
    /// Only a `Pending` payment transitions; an already-settled payment is
    /// returned unchanged with `transitioned = false`, which is what makes
    /// the settlement handler safe to invoke more than once. The check and
    /// the write happen under one lock.
    pub async fn try_settle(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> AppResult<(Payment, bool)> {
        if status == PaymentStatus::Pending {
            return Err(AppError::BadRequest(
                "Cannot settle a payment back to pending".to_string(),
            ));
        }

        let mut payments = self.store.payments.write().await;
        let payment = payments
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Payment {id}")))?;

        if payment.status != PaymentStatus::Pending {
            return Ok((payment.clone(), false));
        }

        payment.status = status;
        payment.settled_at = Some(Utc::now());
        Ok((payment.clone(), true))
    }
}
