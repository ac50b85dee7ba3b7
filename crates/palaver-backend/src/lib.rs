//! In-memory chat service backend.
//!
//! [`MemoryBackend`] implements [`ChatService`] entirely in process: a user
//! directory, conversations, message logs, and per-conversation broadcast
//! channels for message and typing events. It backs the local demo mode and
//! the integration tests; the trait boundary is the same one a remote
//! backend would sit behind.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use palaver_core::{
    ChatService, Conversation, ConversationId, Message, MessageId, ServiceError, TypingEvent,
    TypingPhase, User, UserId,
};
use tokio::sync::broadcast;

/// Capacity of the per-conversation event channels. Lagging subscribers
/// miss events rather than blocking publishers.
const CHANNEL_CAPACITY: usize = 32;

/// In-memory [`ChatService`] implementation.
///
/// All state is wrapped in `Arc<Mutex<>>` to allow Clone and concurrent
/// access. Thread-safe through Mutex, but uses `lock().expect()` which will
/// panic if the mutex is poisoned. Locks are never held across await
/// points.
#[derive(Clone)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryBackendInner>>,
}

struct MemoryBackendInner {
    /// User records by identifier.
    users: HashMap<UserId, User>,

    /// Username to user id, for exact-match discovery.
    usernames: HashMap<String, UserId>,

    /// Conversation records by identifier.
    conversations: HashMap<ConversationId, Conversation>,

    /// Message logs in creation order.
    messages: HashMap<ConversationId, Vec<Message>>,

    /// Message change channels, created on first use.
    message_channels: HashMap<ConversationId, broadcast::Sender<Message>>,

    /// Typing indicator channels, created on first use.
    typing_channels: HashMap<ConversationId, broadcast::Sender<TypingEvent>>,

    next_user: u64,
    next_conversation: u64,
    next_message: u64,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryBackendInner {
                users: HashMap::new(),
                usernames: HashMap::new(),
                conversations: HashMap::new(),
                messages: HashMap::new(),
                message_channels: HashMap::new(),
                typing_channels: HashMap::new(),
                next_user: 0,
                next_conversation: 0,
                next_message: 0,
            })),
        }
    }

    /// Register a user in the directory and return the record.
    ///
    /// Registering an already-taken username returns the existing record.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock).
    #[allow(clippy::expect_used)]
    pub fn register_user(&self, username: &str, display_name: &str) -> User {
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        if let Some(id) = inner.usernames.get(username) {
            if let Some(existing) = inner.users.get(id) {
                return existing.clone();
            }
        }

        inner.next_user += 1;
        let user = User::new(format!("user-{}", inner.next_user), display_name);
        inner.usernames.insert(username.to_owned(), user.id.clone());
        inner.users.insert(user.id.clone(), user.clone());
        tracing::debug!(username, user_id = %user.id, "registered user");
        user
    }

    /// Number of conversations held.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn conversation_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").conversations.len()
    }

    #[allow(clippy::expect_used)]
    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryBackendInner> {
        self.inner.lock().expect("Mutex poisoned")
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackendInner {
    fn message_sender(&mut self, conversation_id: &ConversationId) -> &broadcast::Sender<Message> {
        self.message_channels
            .entry(conversation_id.clone())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
    }

    fn typing_sender(
        &mut self,
        conversation_id: &ConversationId,
    ) -> &broadcast::Sender<TypingEvent> {
        self.typing_channels
            .entry(conversation_id.clone())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
    }

    fn require_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<&Conversation, ServiceError> {
        self.conversations.get(conversation_id).ok_or_else(|| {
            ServiceError::ConversationNotFound { conversation_id: conversation_id.clone() }
        })
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

#[async_trait]
impl ChatService for MemoryBackend {
    async fn discover_user(&self, username: &str) -> Result<Vec<User>, ServiceError> {
        let inner = self.lock();
        let matches = inner
            .usernames
            .get(username)
            .and_then(|id| inner.users.get(id))
            .cloned()
            .into_iter()
            .collect();
        Ok(matches)
    }

    async fn fetch_user(&self, user_id: &UserId) -> Result<User, ServiceError> {
        self.lock()
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownUser { user_id: user_id.clone() })
    }

    async fn create_direct_conversation(
        &self,
        creator: &UserId,
        other: &UserId,
    ) -> Result<Conversation, ServiceError> {
        let mut inner = self.lock();
        for user_id in [creator, other] {
            if !inner.users.contains_key(user_id) {
                return Err(ServiceError::UnknownUser { user_id: user_id.clone() });
            }
        }

        inner.next_conversation += 1;
        let conversation = Conversation {
            id: ConversationId::new(format!("conv-{}", inner.next_conversation)),
            title: None,
            participant_ids: vec![creator.clone(), other.clone()],
            participant_count: 2,
            last_activity_ms: now_ms(),
        };
        inner.conversations.insert(conversation.id.clone(), conversation.clone());
        inner.messages.insert(conversation.id.clone(), Vec::new());
        tracing::debug!(conversation_id = %conversation.id, "created direct conversation");
        Ok(conversation)
    }

    async fn create_message(
        &self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        body: &str,
    ) -> Result<Message, ServiceError> {
        let mut inner = self.lock();
        inner.require_conversation(conversation_id)?;

        inner.next_message += 1;
        let message = Message {
            id: MessageId::new(format!("msg-{}", inner.next_message)),
            conversation_id: conversation_id.clone(),
            sender_id: sender_id.clone(),
            body: body.to_owned(),
            updated_at_ms: now_ms(),
        };
        inner.messages.entry(conversation_id.clone()).or_default().push(message.clone());

        // No subscribers is fine
        let _ = inner.message_sender(conversation_id).send(message.clone());
        Ok(message)
    }

    async fn fetch_messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, ServiceError> {
        let inner = self.lock();
        inner.require_conversation(conversation_id)?;
        Ok(inner.messages.get(conversation_id).cloned().unwrap_or_default())
    }

    async fn touch_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<(), ServiceError> {
        let mut inner = self.lock();
        let now = now_ms();
        match inner.conversations.get_mut(conversation_id) {
            Some(conversation) => {
                conversation.last_activity_ms = conversation.last_activity_ms.max(now);
                Ok(())
            },
            None => Err(ServiceError::ConversationNotFound {
                conversation_id: conversation_id.clone(),
            }),
        }
    }

    fn subscribe_messages(&self, conversation_id: &ConversationId) -> broadcast::Receiver<Message> {
        self.lock().message_sender(conversation_id).subscribe()
    }

    fn subscribe_typing(
        &self,
        conversation_id: &ConversationId,
    ) -> broadcast::Receiver<TypingEvent> {
        self.lock().typing_sender(conversation_id).subscribe()
    }

    async fn publish_typing(
        &self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        phase: TypingPhase,
    ) -> Result<(), ServiceError> {
        let mut inner = self.lock();
        inner.require_conversation(conversation_id)?;

        let event = TypingEvent {
            conversation_id: conversation_id.clone(),
            entries: vec![(TypingEvent::composite_key(sender_id), phase)],
        };
        let _ = inner.typing_sender(conversation_id).send(event);
        Ok(())
    }
}
