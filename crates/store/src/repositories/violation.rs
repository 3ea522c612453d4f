//! Violation repository.

use crate::MemStore;
use crate::entities::violation::{NewViolation, Violation, ViolationStatus};
use chrono::Utc;
use lovear_common::{AppError, AppResult};
use std::sync::Arc;

/// Repository for violation records.
#[derive(Debug, Clone)]
pub struct ViolationRepository {
    store: Arc<MemStore>,
}

impl ViolationRepository {
    /// Create a new violation repository.
    #[must_use]
    pub const fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// Record a violation.
    pub async fn create(&self, new: NewViolation) -> AppResult<Violation> {
        let mut violations = self.store.violations.write().await;

        let violation = Violation {
            id: self.store.next_id(),
            user_id: new.user_id,
            reporter_id: new.reporter_id,
            violation_type: new.violation_type,
            fine_amount: new.fine_amount,
            status: ViolationStatus::Pending,
            created_at: Utc::now(),
        };

        violations.insert(violation.id.clone(), violation.clone());
        Ok(violation)
    }

    /// Find a violation by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Violation>> {
        Ok(self.store.violations.read().await.get(id).cloned())
    }

    /// Get a violation by ID, erroring when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Violation> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Violation {id}")))
    }

    /// All violations recorded against a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Violation>> {
        let mut found: Vec<Violation> = self
            .store
            .violations
            .read()
            .await
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(found)
    }

    /// Set the resolution status.
    pub async fn set_status(&self, id: &str, status: ViolationStatus) -> AppResult<Violation> {
        let mut violations = self.store.violations.write().await;
        let violation = violations
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Violation {id}")))?;
        violation.status = status;
        Ok(violation.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::violation::ViolationType;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_create_and_resolve() {
        let repo = ViolationRepository::new(MemStore::new());
        let v = repo
            .create(NewViolation {
                user_id: "a".to_string(),
                reporter_id: None,
                violation_type: ViolationType::PhoneNumber,
                fine_amount: Decimal::new(500, 1),
            })
            .await
            .unwrap();
        assert_eq!(v.status, ViolationStatus::Pending);

        let resolved = repo.set_status(&v.id, ViolationStatus::FinePaid).await.unwrap();
        assert_eq!(resolved.status, ViolationStatus::FinePaid);
        assert_eq!(repo.find_by_user("a").await.unwrap().len(), 1);
    }
}
