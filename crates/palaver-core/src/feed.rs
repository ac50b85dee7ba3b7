//! Ordered, deduplicated message list.
//!
//! The feed owns message ordering so views never have to: messages are kept
//! sorted by `(updated_at_ms, id)` and deduplicated by id. Inserting a
//! message that is already present replaces the stored record, which is how
//! edits delivered over the change subscription land.

use std::collections::HashSet;

use crate::model::{Message, MessageId};

/// Managed message list for one conversation.
#[derive(Debug, Clone, Default)]
pub struct MessageFeed {
    messages: Vec<Message>,
}

impl MessageFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire feed with a fetched history.
    ///
    /// Duplicate ids keep the record with the newest timestamp, regardless
    /// of where the duplicates sit in the input.
    pub fn replace_all(&mut self, mut messages: Vec<Message>) {
        messages.sort_by(|a, b| {
            (a.updated_at_ms, &a.id).cmp(&(b.updated_at_ms, &b.id))
        });

        let mut seen: HashSet<MessageId> = HashSet::with_capacity(messages.len());
        let mut deduped: Vec<Message> = Vec::with_capacity(messages.len());
        for message in messages.into_iter().rev() {
            if seen.insert(message.id.clone()) {
                deduped.push(message);
            }
        }
        deduped.reverse();
        self.messages = deduped;
    }

    /// Insert or replace a single message, keeping the feed ordered.
    pub fn insert(&mut self, message: Message) {
        if let Some(existing) = self.messages.iter_mut().find(|m| m.id == message.id) {
            *existing = message;
            return;
        }

        let key = (message.updated_at_ms, message.id.clone());
        let pos = self
            .messages
            .partition_point(|m| (m.updated_at_ms, m.id.clone()) <= key);
        self.messages.insert(pos, message);
    }

    /// Whether a message with the given id is present.
    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the feed.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the feed holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConversationId, UserId};

    fn message(id: &str, at_ms: u64) -> Message {
        Message {
            id: MessageId::new(id),
            conversation_id: ConversationId::new("conv-1"),
            sender_id: UserId::new("user-1"),
            body: format!("body of {id}"),
            updated_at_ms: at_ms,
        }
    }

    #[test]
    fn insert_keeps_chronological_order() {
        let mut feed = MessageFeed::new();
        feed.insert(message("m3", 30));
        feed.insert(message("m1", 10));
        feed.insert(message("m2", 20));

        let ids: Vec<_> = feed.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m1", "m2", "m3"]);
    }

    #[test]
    fn insert_replaces_existing_id() {
        let mut feed = MessageFeed::new();
        feed.insert(message("m1", 10));

        let mut edited = message("m1", 10);
        edited.body = "edited".into();
        feed.insert(edited);

        assert_eq!(feed.len(), 1);
        assert_eq!(feed.messages()[0].body, "edited");
    }

    #[test]
    fn equal_timestamps_order_by_id() {
        let mut feed = MessageFeed::new();
        feed.insert(message("m2", 10));
        feed.insert(message("m1", 10));

        let ids: Vec<_> = feed.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m1", "m2"]);
    }

    #[test]
    fn replace_all_sorts_and_dedups() {
        let mut feed = MessageFeed::new();
        feed.replace_all(vec![message("m2", 20), message("m1", 10), message("m1", 10)]);

        assert_eq!(feed.len(), 2);
        assert!(feed.contains(&MessageId::new("m1")));
    }

    #[test]
    fn replace_all_dedups_non_adjacent_duplicates() {
        // Same id at different timestamps, separated by another message
        let mut feed = MessageFeed::new();
        feed.replace_all(vec![message("m1", 10), message("m2", 15), message("m1", 20)]);

        assert_eq!(feed.len(), 2);
        let records: Vec<_> =
            feed.messages().iter().map(|m| (m.id.as_str(), m.updated_at_ms)).collect();
        assert_eq!(records, [("m2", 15), ("m1", 20)]);
    }
}
