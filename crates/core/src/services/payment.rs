//! Payment service: pending payments and their one-shot settlement.

use lovear_common::{AppError, AppResult};
use lovear_store::entities::{NewPayment, Payment, PaymentStatus, PaymentType, ViolationStatus};
use lovear_store::{PaymentRepository, UserRepository, ViolationRepository};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::AccountService;

/// Payment service for business logic.
#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    violation_repo: ViolationRepository,
    user_repo: UserRepository,
    accounts: AccountService,
}

/// Input for initiating a payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentInput {
    pub amount: Decimal,
    pub payment_type: PaymentType,
    /// Required for fine payments; ignored otherwise.
    pub violation_id: Option<String>,
}

impl PaymentService {
    /// Create a new payment service.
    #[must_use]
    pub const fn new(
        payment_repo: PaymentRepository,
        violation_repo: ViolationRepository,
        user_repo: UserRepository,
        accounts: AccountService,
    ) -> Self {
        Self {
            payment_repo,
            violation_repo,
            user_repo,
            accounts,
        }
    }

    /// Initiate a pending payment.
    ///
    /// A fine payment must reference one of the payer's own unresolved
    /// violations; its amount is taken from the violation record rather than
    /// the input.
    pub async fn create(&self, user_id: &str, input: CreatePaymentInput) -> AppResult<Payment> {
        self.user_repo.get_by_id(user_id).await?;

        let (amount, violation_id) = if input.payment_type == PaymentType::Fine {
            let Some(violation_id) = input.violation_id else {
                return Err(AppError::BadRequest(
                    "Fine payments must reference a violation".to_string(),
                ));
            };
            let violation = self.violation_repo.get_by_id(&violation_id).await?;
            if violation.user_id != user_id {
                return Err(AppError::Forbidden(
                    "Cannot pay a fine on someone else's violation".to_string(),
                ));
            }
            if violation.status != ViolationStatus::Pending {
                return Err(AppError::Conflict(
                    "Violation is already resolved".to_string(),
                ));
            }
            (violation.fine_amount, Some(violation_id))
        } else {
            if input.amount <= Decimal::ZERO {
                return Err(AppError::BadRequest(
                    "Payment amount must be positive".to_string(),
                ));
            }
            (input.amount, None)
        };

        let payment = self
            .payment_repo
            .create(NewPayment {
                user_id: user_id.to_string(),
                amount,
                payment_type: input.payment_type,
                violation_id,
            })
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            user_id,
            payment_type = ?payment.payment_type,
            amount = %payment.amount,
            "Payment initiated"
        );
        Ok(payment)
    }

    /// Settle a pending payment.
    ///
    /// The transition happens at most once; repeated settlement calls (and
    /// racing ones) return the already-settled record without re-applying
    /// effects. Effects run only on the call that performed the transition
    /// to `Completed`.
    pub async fn settle(&self, payment_id: &str, success: bool) -> AppResult<Payment> {
        let status = if success {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Failed
        };

        let (payment, transitioned) = self.payment_repo.try_settle(payment_id, status).await?;
        if !transitioned {
            return Ok(payment);
        }

        if payment.status == PaymentStatus::Completed {
            self.apply_completion(&payment).await?;
        }

        tracing::info!(
            payment_id,
            status = ?payment.status,
            "Payment settled"
        );
        Ok(payment)
    }

    /// Payment history for a user, newest first.
    pub async fn history(&self, user_id: &str) -> AppResult<Vec<Payment>> {
        self.payment_repo.find_by_user(user_id).await
    }

    /// Fetch a single payment. Owner only.
    pub async fn get(&self, payment_id: &str, user_id: &str) -> AppResult<Payment> {
        let payment = self.payment_repo.get_by_id(payment_id).await?;
        if payment.user_id != user_id {
            return Err(AppError::Forbidden("Not your payment".to_string()));
        }
        Ok(payment)
    }

    async fn apply_completion(&self, payment: &Payment) -> AppResult<()> {
        match payment.payment_type {
            PaymentType::Premium => {
                self.user_repo.set_premium(&payment.user_id, true).await?;
            }
            PaymentType::WalletTopup => {
                self.accounts
                    .credit_wallet(&payment.user_id, payment.amount)
                    .await?;
            }
            PaymentType::Fine => {
                if let Some(violation_id) = &payment.violation_id {
                    self.violation_repo
                        .set_status(violation_id, ViolationStatus::FinePaid)
                        .await?;
                }
                self.accounts.lift_suspension(&payment.user_id).await?;
            }
            // The escrow moved through the wallet when the date was created.
            PaymentType::BlindDate => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::account::RegisterInput;
    use chrono::{Duration, Utc};
    use lovear_store::MemStore;
    use lovear_store::entities::{Gender, LookingFor, NewViolation, ViolationType};
    use rust_decimal_macros::dec;

    struct Harness {
        service: PaymentService,
        accounts: AccountService,
        violation_repo: ViolationRepository,
    }

    fn setup() -> Harness {
        let store = MemStore::new();
        let user_repo = UserRepository::new(store.clone());
        let accounts = AccountService::new(user_repo.clone());
        let violation_repo = ViolationRepository::new(store.clone());
        let service = PaymentService::new(
            PaymentRepository::new(store),
            violation_repo.clone(),
            user_repo,
            accounts.clone(),
        );
        Harness {
            service,
            accounts,
            violation_repo,
        }
    }

    async fn user(accounts: &AccountService, username: &str) -> String {
        accounts
            .register(RegisterInput {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "correct horse battery".to_string(),
                display_name: None,
                gender: Gender::Male,
                looking_for: LookingFor::Both,
                age: 30,
                age_min: 18,
                age_max: 99,
                max_distance_km: 50.0,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_topup_credits_wallet_on_completion_only() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;

        let payment = h
            .service
            .create(
                &alice,
                CreatePaymentInput {
                    amount: dec!(100.0),
                    payment_type: PaymentType::WalletTopup,
                    violation_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(
            h.accounts.profile(&alice).await.unwrap().wallet_balance,
            Decimal::ZERO
        );

        let settled = h.service.settle(&payment.id, true).await.unwrap();
        assert_eq!(settled.status, PaymentStatus::Completed);
        assert_eq!(
            h.accounts.profile(&alice).await.unwrap().wallet_balance,
            dec!(100.0)
        );
    }

    #[tokio::test]
    async fn test_settlement_applies_effects_at_most_once() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;

        let payment = h
            .service
            .create(
                &alice,
                CreatePaymentInput {
                    amount: dec!(100.0),
                    payment_type: PaymentType::WalletTopup,
                    violation_id: None,
                },
            )
            .await
            .unwrap();

        h.service.settle(&payment.id, true).await.unwrap();
        // A duplicate settlement is a no-op, even with the opposite outcome.
        let again = h.service.settle(&payment.id, false).await.unwrap();
        assert_eq!(again.status, PaymentStatus::Completed);
        assert_eq!(
            h.accounts.profile(&alice).await.unwrap().wallet_balance,
            dec!(100.0)
        );
    }

    #[tokio::test]
    async fn test_failed_settlement_has_no_effect() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;

        let payment = h
            .service
            .create(
                &alice,
                CreatePaymentInput {
                    amount: dec!(10.0),
                    payment_type: PaymentType::Premium,
                    violation_id: None,
                },
            )
            .await
            .unwrap();

        let settled = h.service.settle(&payment.id, false).await.unwrap();
        assert_eq!(settled.status, PaymentStatus::Failed);
        assert!(!h.accounts.profile(&alice).await.unwrap().is_premium);
    }

    #[tokio::test]
    async fn test_premium_flag_set_on_completion() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;

        let payment = h
            .service
            .create(
                &alice,
                CreatePaymentInput {
                    amount: dec!(10.0),
                    payment_type: PaymentType::Premium,
                    violation_id: None,
                },
            )
            .await
            .unwrap();
        h.service.settle(&payment.id, true).await.unwrap();
        assert!(h.accounts.profile(&alice).await.unwrap().is_premium);
    }

    #[tokio::test]
    async fn test_fine_payment_resolves_violation_and_lifts_suspension() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;
        let violation = h
            .violation_repo
            .create(NewViolation {
                user_id: alice.clone(),
                reporter_id: None,
                violation_type: ViolationType::PhoneNumber,
                fine_amount: dec!(50.0),
            })
            .await
            .unwrap();
        h.accounts
            .suspend_until(&alice, Utc::now() + Duration::hours(24))
            .await
            .unwrap();

        let payment = h
            .service
            .create(
                &alice,
                CreatePaymentInput {
                    // Ignored: the fine amount comes from the violation.
                    amount: dec!(1.0),
                    payment_type: PaymentType::Fine,
                    violation_id: Some(violation.id.clone()),
                },
            )
            .await
            .unwrap();
        assert_eq!(payment.amount, dec!(50.0));

        h.service.settle(&payment.id, true).await.unwrap();

        let resolved = h.violation_repo.get_by_id(&violation.id).await.unwrap();
        assert_eq!(resolved.status, ViolationStatus::FinePaid);
        let freed = h.accounts.profile(&alice).await.unwrap();
        assert!(!freed.is_suspended_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_fine_guards() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;
        let bob = user(&h.accounts, "bob").await;
        let violation = h
            .violation_repo
            .create(NewViolation {
                user_id: alice.clone(),
                reporter_id: None,
                violation_type: ViolationType::Spam,
                fine_amount: dec!(50.0),
            })
            .await
            .unwrap();

        assert!(matches!(
            h.service
                .create(
                    &alice,
                    CreatePaymentInput {
                        amount: dec!(50.0),
                        payment_type: PaymentType::Fine,
                        violation_id: None,
                    },
                )
                .await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            h.service
                .create(
                    &bob,
                    CreatePaymentInput {
                        amount: dec!(50.0),
                        payment_type: PaymentType::Fine,
                        violation_id: Some(violation.id.clone()),
                    },
                )
                .await,
            Err(AppError::Forbidden(_))
        ));
    }
}
