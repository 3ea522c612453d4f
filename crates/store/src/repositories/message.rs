//! Message repository.

use crate::MemStore;
use crate::entities::message::{Message, NewMessage};
use chrono::Utc;
use lovear_common::AppResult;
use std::sync::Arc;

/// Repository for message operations.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    store: Arc<MemStore>,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// Create a message.
    pub async fn create(&self, new: NewMessage) -> AppResult<Message> {
        let mut messages = self.store.messages.write().await;

        let message = Message {
            id: self.store.next_id(),
            match_id: new.match_id,
            sender_id: new.sender_id,
            content: new.content,
            is_read: false,
            sent_at: Utc::now(),
        };

        messages.insert(message.id.clone(), message.clone());
        Ok(message)
    }

    /// Find a message by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Message>> {
        Ok(self.store.messages.read().await.get(id).cloned())
    }

    /// Messages in a match, newest first, optionally older than `until_id`.
    pub async fn find_by_match(
        &self,
        match_id: &str,
        limit: usize,
        until_id: Option<&str>,
    ) -> AppResult<Vec<Message>> {
        let messages = self.store.messages.read().await;

        let cutoff = until_id
            .and_then(|id| messages.get(id))
            .map(|m| m.sent_at);

        let mut found: Vec<Message> = messages
            .values()
            .filter(|m| m.match_id == match_id)
            .filter(|m| cutoff.is_none_or(|c| m.sent_at < c))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then_with(|| b.id.cmp(&a.id)));
        found.truncate(limit);
        Ok(found)
    }

    /// Mark every message in a match not sent by `reader_id` as read.
    /// Returns the number of messages flipped.
    pub async fn mark_read(&self, match_id: &str, reader_id: &str) -> AppResult<u64> {
        let mut messages = self.store.messages.write().await;
        let mut flipped = 0;

        for message in messages.values_mut() {
            if message.match_id == match_id && message.sender_id != reader_id && !message.is_read {
                message.is_read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    /// Unread messages addressed to `reader_id` within the given matches.
    pub async fn count_unread_in(&self, match_ids: &[String], reader_id: &str) -> AppResult<u64> {
        Ok(self
            .store
            .messages
            .read()
            .await
            .values()
            .filter(|m| {
                !m.is_read && m.sender_id != reader_id && match_ids.contains(&m.match_id)
            })
            .count() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message(match_id: &str, sender: &str, content: &str) -> NewMessage {
        NewMessage {
            match_id: match_id.to_string(),
            sender_id: sender.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_conversation_order_and_limit() {
        let repo = MessageRepository::new(MemStore::new());
        for i in 0..5 {
            repo.create(message("m1", "a", &format!("msg {i}")))
                .await
                .unwrap();
        }
        repo.create(message("m2", "a", "other match")).await.unwrap();

        let found = repo.find_by_match("m1", 3, None).await.unwrap();
        assert_eq!(found.len(), 3);
        // Newest first.
        assert!(found[0].sent_at >= found[1].sent_at);
        assert!(found.iter().all(|m| m.match_id == "m1"));
    }

    #[tokio::test]
    async fn test_mark_read_skips_own_messages() {
        let repo = MessageRepository::new(MemStore::new());
        repo.create(message("m1", "a", "from a")).await.unwrap();
        repo.create(message("m1", "b", "from b")).await.unwrap();

        // Reading as "a" flips only b's message.
        let flipped = repo.mark_read("m1", "a").await.unwrap();
        assert_eq!(flipped, 1);

        let remaining = repo
            .count_unread_in(&["m1".to_string()], "b")
            .await
            .unwrap();
        assert_eq!(remaining, 1);
    }
}
