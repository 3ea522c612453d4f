//! Messaging service: conversations gated by the moderation filter.

use chrono::{Duration, Utc};
use lovear_common::{AppError, AppResult, config::ModerationConfig};
use lovear_store::entities::{Match, Message, NewMessage, NewViolation};
use lovear_store::{MatchRepository, MessageRepository, UserRepository, ViolationRepository};
use serde::Deserialize;
use validator::Validate;

use crate::{AccountService, ModerationFilter};

/// Default page size for conversation history.
const DEFAULT_PAGE_SIZE: usize = 50;

/// Messaging service for business logic.
#[derive(Clone)]
pub struct MessagingService {
    message_repo: MessageRepository,
    match_repo: MatchRepository,
    user_repo: UserRepository,
    violation_repo: ViolationRepository,
    accounts: AccountService,
    filter: ModerationFilter,
    config: ModerationConfig,
}

/// Input for sending a message.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageInput {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

impl MessagingService {
    /// Create a new messaging service.
    #[must_use]
    pub const fn new(
        message_repo: MessageRepository,
        match_repo: MatchRepository,
        user_repo: UserRepository,
        violation_repo: ViolationRepository,
        accounts: AccountService,
        filter: ModerationFilter,
        config: ModerationConfig,
    ) -> Self {
        Self {
            message_repo,
            match_repo,
            user_repo,
            violation_repo,
            accounts,
            filter,
            config,
        }
    }

    /// Send a message within a match.
    ///
    /// Every outgoing message passes through the moderation filter first. A
    /// flagged message is never stored: each detected violation type is
    /// recorded with the configured fine, the sender is suspended, and the
    /// send fails with `ContentRejected`.
    pub async fn send_message(
        &self,
        match_id: &str,
        sender_id: &str,
        input: SendMessageInput,
    ) -> AppResult<Message> {
        input.validate()?;

        let m = self.match_repo.get_by_id(match_id).await?;
        if !m.involves(sender_id) {
            return Err(AppError::Forbidden(
                "Not a participant of this match".to_string(),
            ));
        }
        if !m.is_active {
            return Err(AppError::Conflict("Match is no longer active".to_string()));
        }

        let sender = self.user_repo.get_by_id(sender_id).await?;
        let now = Utc::now();
        if sender.is_suspended_at(now) {
            let until = sender.suspended_until.unwrap_or(now);
            return Err(AppError::Suspended(until));
        }

        let verdict = self.filter.moderate(&input.content);
        if verdict.is_violation {
            for violation_type in &verdict.violation_types {
                self.violation_repo
                    .create(NewViolation {
                        user_id: sender_id.to_string(),
                        reporter_id: None,
                        violation_type: *violation_type,
                        fine_amount: self.config.fine_amount,
                    })
                    .await?;
            }

            let until = now + Duration::hours(self.config.suspension_hours);
            self.accounts.suspend_until(sender_id, until).await?;

            tracing::warn!(
                sender_id,
                match_id,
                violation_types = ?verdict.violation_types,
                confidence = verdict.confidence,
                "Message rejected by moderation, sender suspended"
            );
            return Err(AppError::ContentRejected(format!(
                "Message violates community guidelines (confidence {:.2})",
                verdict.confidence
            )));
        }

        self.message_repo
            .create(NewMessage {
                match_id: match_id.to_string(),
                sender_id: sender_id.to_string(),
                content: input.content,
            })
            .await
    }

    /// Page through a conversation, newest first. Participant only.
    pub async fn conversation(
        &self,
        match_id: &str,
        user_id: &str,
        limit: Option<usize>,
        until_id: Option<&str>,
    ) -> AppResult<Vec<Message>> {
        self.require_participant(match_id, user_id).await?;
        self.message_repo
            .find_by_match(match_id, limit.unwrap_or(DEFAULT_PAGE_SIZE), until_id)
            .await
    }

    /// Mark the partner's messages in a match as read. Returns the number
    /// of messages flipped.
    pub async fn mark_read(&self, match_id: &str, user_id: &str) -> AppResult<u64> {
        self.require_participant(match_id, user_id).await?;
        self.message_repo.mark_read(match_id, user_id).await
    }

    /// Unread messages addressed to the user across their active matches.
    pub async fn unread_count(&self, user_id: &str) -> AppResult<u64> {
        let match_ids: Vec<String> = self
            .match_repo
            .find_active_for_user(user_id)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();
        self.message_repo.count_unread_in(&match_ids, user_id).await
    }

    async fn require_participant(&self, match_id: &str, user_id: &str) -> AppResult<Match> {
        let m = self.match_repo.get_by_id(match_id).await?;
        if !m.involves(user_id) {
            return Err(AppError::Forbidden(
                "Not a participant of this match".to_string(),
            ));
        }
        Ok(m)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::account::RegisterInput;
    use lovear_store::MemStore;
    use lovear_store::entities::{Gender, LookingFor, NewMatch, ViolationType};

    struct Harness {
        service: MessagingService,
        accounts: AccountService,
        match_repo: MatchRepository,
        violation_repo: ViolationRepository,
    }

    fn setup() -> Harness {
        let store = MemStore::new();
        let user_repo = UserRepository::new(store.clone());
        let accounts = AccountService::new(user_repo.clone());
        let match_repo = MatchRepository::new(store.clone());
        let violation_repo = ViolationRepository::new(store.clone());
        let service = MessagingService::new(
            MessageRepository::new(store),
            match_repo.clone(),
            user_repo,
            violation_repo.clone(),
            accounts.clone(),
            ModerationFilter::new(false),
            ModerationConfig::default(),
        );
        Harness {
            service,
            accounts,
            match_repo,
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
                gender: Gender::Female,
                looking_for: LookingFor::Both,
                age: 28,
                age_min: 18,
                age_max: 99,
                max_distance_km: 50.0,
            })
            .await
            .unwrap()
            .id
    }

    fn message(content: &str) -> SendMessageInput {
        SendMessageInput {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_clean_message_is_stored() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;
        let bob = user(&h.accounts, "bob").await;
        let m = h
            .match_repo
            .create(NewMatch {
                user1_id: alice.clone(),
                user2_id: bob.clone(),
            })
            .await
            .unwrap();

        let sent = h
            .service
            .send_message(&m.id, &alice, message("I'll see you at 7"))
            .await
            .unwrap();
        assert_eq!(sent.content, "I'll see you at 7");

        let history = h
            .service
            .conversation(&m.id, &bob, None, None)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(h.service.unread_count(&bob).await.unwrap(), 1);

        h.service.mark_read(&m.id, &bob).await.unwrap();
        assert_eq!(h.service.unread_count(&bob).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_phone_number_is_rejected_fined_and_suspended() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;
        let bob = user(&h.accounts, "bob").await;
        let m = h
            .match_repo
            .create(NewMatch {
                user1_id: alice.clone(),
                user2_id: bob.clone(),
            })
            .await
            .unwrap();

        let err = h
            .service
            .send_message(&m.id, &alice, message("call me at 555-123-4567"))
            .await;
        assert!(matches!(err, Err(AppError::ContentRejected(_))));

        // Nothing was stored.
        assert!(h
            .service
            .conversation(&m.id, &bob, None, None)
            .await
            .unwrap()
            .is_empty());

        // A violation was recorded and the sender suspended.
        let violations = h.violation_repo.find_by_user(&alice).await.unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::PhoneNumber);

        let suspended = h.accounts.profile(&alice).await.unwrap();
        assert!(suspended.is_suspended_at(Utc::now()));

        // Suspended senders cannot message at all.
        let err = h
            .service
            .send_message(&m.id, &alice, message("sorry about that"))
            .await;
        assert!(matches!(err, Err(AppError::Suspended(_))));

        // The partner is unaffected.
        h.service
            .send_message(&m.id, &bob, message("hello?"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_participant_cannot_read_or_send() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;
        let bob = user(&h.accounts, "bob").await;
        let eve = user(&h.accounts, "eve").await;
        let m = h
            .match_repo
            .create(NewMatch {
                user1_id: alice,
                user2_id: bob,
            })
            .await
            .unwrap();

        assert!(matches!(
            h.service.send_message(&m.id, &eve, message("hi")).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            h.service.conversation(&m.id, &eve, None, None).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_inactive_match_rejects_messages() {
        let h = setup();
        let alice = user(&h.accounts, "alice").await;
        let bob = user(&h.accounts, "bob").await;
        let m = h
            .match_repo
            .create(NewMatch {
                user1_id: alice.clone(),
                user2_id: bob,
            })
            .await
            .unwrap();
        h.match_repo.set_active(&m.id, false).await.unwrap();

        assert!(matches!(
            h.service.send_message(&m.id, &alice, message("hi")).await,
            Err(AppError::Conflict(_))
        ));
    }
}
