//! Conversation view state machine.
//!
//! Owns everything one mounted conversation needs to render: the resolved
//! title, the participant map with per-user typing flags, and the ordered
//! message feed. Mounting emits the subscription and load actions; the
//! runtime feeds results back through [`App::handle`](crate::App::handle).
//!
//! # Invariant
//!
//! Once participants load, the participant map's key set equals the
//! conversation's participant id set exactly.

use std::collections::HashMap;

use palaver_core::{
    Conversation, ConversationId, Message, MessageFeed, TypingEvent, TypingPhase, User, UserId,
};

use crate::{AppAction, Session, title};

/// Header title of a conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    /// Participant records not resolved yet.
    Loading,
    /// The conversation carries an explicit title; it always wins.
    Explicit(String),
    /// Derived from participant display names.
    Resolved(String),
}

impl Title {
    /// Text to render.
    pub fn text(&self) -> &str {
        match self {
            Self::Loading => "loading...",
            Self::Explicit(s) | Self::Resolved(s) => s,
        }
    }
}

/// Per-participant typing activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    /// Not typing.
    #[default]
    Idle,
    /// An unmatched `begin` is active.
    Typing,
}

/// A participant as held in view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// The resolved user record.
    pub user: User,
    /// Transient typing state, never persisted.
    pub activity: Activity,
}

/// State machine for one mounted conversation.
#[derive(Debug, Clone)]
pub struct ConversationView {
    conversation: Conversation,
    title: Title,
    participants: HashMap<UserId, Participant>,
    feed: MessageFeed,
}

impl ConversationView {
    /// Mount a view for a conversation.
    ///
    /// Returns the view plus the actions that start its lifecycle:
    /// subscribing to message and typing events, fetching history, and
    /// resolving all participant records concurrently.
    pub fn mount(conversation: Conversation) -> (Self, Vec<AppAction>) {
        let title = match &conversation.title {
            Some(explicit) => Title::Explicit(explicit.clone()),
            None => Title::Loading,
        };

        let actions = vec![
            AppAction::Subscribe { conversation_id: conversation.id.clone() },
            AppAction::LoadHistory { conversation_id: conversation.id.clone() },
            AppAction::LoadParticipants {
                conversation_id: conversation.id.clone(),
                user_ids: conversation.participant_ids.clone(),
            },
            AppAction::Render,
        ];

        let view = Self {
            conversation,
            title,
            participants: HashMap::new(),
            feed: MessageFeed::new(),
        };

        (view, actions)
    }

    /// Release the view's subscriptions. Callers are required to execute the
    /// returned actions; dropping them leaks the typing subscription.
    pub fn unmount(&self) -> Vec<AppAction> {
        vec![AppAction::Unsubscribe { conversation_id: self.conversation.id.clone() }]
    }

    /// Handle resolved participant records.
    pub fn on_participants_loaded(
        &mut self,
        users: Vec<User>,
        session: &Session,
    ) -> Vec<AppAction> {
        if !matches!(self.title, Title::Explicit(_)) {
            self.title = Title::Resolved(title::participant_title(&users, session.user_id()));
        }

        self.participants = users
            .into_iter()
            .map(|user| {
                (user.id.clone(), Participant { user, activity: Activity::Idle })
            })
            .collect();

        vec![AppAction::Render]
    }

    /// Handle a fetched message history.
    pub fn on_history_loaded(&mut self, messages: Vec<Message>) -> Vec<AppAction> {
        self.feed.replace_all(messages);
        vec![AppAction::Render]
    }

    /// Handle a new or updated message, whether from the change subscription
    /// or from our own completed send.
    pub fn on_message(&mut self, message: Message) -> Vec<AppAction> {
        if message.conversation_id != self.conversation.id {
            return vec![];
        }
        self.feed.insert(message);
        vec![AppAction::Render]
    }

    /// Handle a typing-indicator event.
    ///
    /// Each entry is keyed by a composite identifier; the user id is its
    /// suffix. `begin` sets the flag, `finish` clears it, entries for
    /// unknown users are ignored.
    pub fn on_typing(&mut self, event: &TypingEvent) -> Vec<AppAction> {
        if event.conversation_id != self.conversation.id {
            return vec![];
        }

        for (composite_key, phase) in &event.entries {
            let Some((_, raw_id)) = composite_key.split_once('/') else {
                tracing::debug!(key = %composite_key, "typing entry without composite key");
                continue;
            };

            if let Some(participant) = self.participants.get_mut(&UserId::new(raw_id)) {
                participant.activity = match phase {
                    TypingPhase::Begin => Activity::Typing,
                    TypingPhase::Finish => Activity::Idle,
                };
            }
        }

        vec![AppAction::Render]
    }

    /// Submit the composer.
    ///
    /// An empty body performs no remote call and leaves the feed unchanged.
    /// Otherwise the message create and the metadata touch are requested
    /// separately, with no ordering guarantee between them; the feed is
    /// appended to only once the create completes.
    pub fn compose(&self, body: &str) -> Vec<AppAction> {
        if body.is_empty() {
            return vec![];
        }

        vec![
            AppAction::PostMessage {
                conversation_id: self.conversation.id.clone(),
                body: body.to_owned(),
            },
            AppAction::TouchConversation { conversation_id: self.conversation.id.clone() },
            AppAction::Render,
        ]
    }

    /// Typing-indicator line: comma-joined names of the other participants
    /// currently typing, or the empty string.
    pub fn typing_line(&self, session: &Session) -> String {
        let mut names: Vec<&str> = self
            .participants
            .values()
            .filter(|p| &p.user.id != session.user_id())
            .filter(|p| p.activity == Activity::Typing)
            .map(|p| p.user.display_name.as_str())
            .collect();

        if names.is_empty() {
            return String::new();
        }

        names.sort_unstable();
        format!("{} is typing...", names.join(", "))
    }

    /// The conversation this view renders.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Identifier of the rendered conversation.
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation.id
    }

    /// Header title.
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// Participant count as reported by the service.
    pub fn participant_count(&self) -> usize {
        self.conversation.participant_count
    }

    /// Resolved participants, keyed by user id.
    pub fn participants(&self) -> &HashMap<UserId, Participant> {
        &self.participants
    }

    /// Display name for a sender, falling back to the raw id for users
    /// outside the participant map.
    pub fn sender_name<'a>(&'a self, sender_id: &'a UserId) -> &'a str {
        self.participants
            .get(sender_id)
            .map_or_else(|| sender_id.as_str(), |p| p.user.display_name.as_str())
    }

    /// The ordered message feed.
    pub fn feed(&self) -> &MessageFeed {
        &self.feed
    }
}

#[cfg(test)]
mod tests {
    use palaver_core::MessageId;

    use super::*;

    fn conversation(title: Option<&str>, participants: &[&str]) -> Conversation {
        Conversation {
            id: ConversationId::new("conv-1"),
            title: title.map(str::to_owned),
            participant_ids: participants.iter().map(|id| UserId::new(*id)).collect(),
            participant_count: participants.len(),
            last_activity_ms: 0,
        }
    }

    fn session() -> Session {
        Session::new(User::new("me", "Me"))
    }

    fn message(id: &str, body: &str) -> Message {
        Message {
            id: MessageId::new(id),
            conversation_id: ConversationId::new("conv-1"),
            sender_id: UserId::new("other"),
            body: body.to_owned(),
            updated_at_ms: 1,
        }
    }

    fn typing(composite_key: &str, phase: TypingPhase) -> TypingEvent {
        TypingEvent {
            conversation_id: ConversationId::new("conv-1"),
            entries: vec![(composite_key.to_owned(), phase)],
        }
    }

    #[test]
    fn mount_emits_lifecycle_actions() {
        let (view, actions) = ConversationView::mount(conversation(None, &["me", "other"]));

        assert!(matches!(actions.as_slice(), [
            AppAction::Subscribe { .. },
            AppAction::LoadHistory { .. },
            AppAction::LoadParticipants { .. },
            AppAction::Render,
        ]));
        assert_eq!(view.title().text(), "loading...");
    }

    #[test]
    fn explicit_title_always_wins() {
        let (mut view, _) =
            ConversationView::mount(conversation(Some("Standup"), &["me", "other"]));

        let _ = view.on_participants_loaded(
            vec![User::new("me", "Me"), User::new("other", "A Very Long Display Name Indeed")],
            &session(),
        );

        assert_eq!(view.title().text(), "Standup");
    }

    #[test]
    fn untitled_conversation_derives_title_from_others() {
        let (mut view, _) = ConversationView::mount(conversation(None, &["me", "other"]));

        let _ = view
            .on_participants_loaded(vec![User::new("me", "Me"), User::new("other", "Ada")], &session());

        assert_eq!(view.title().text(), "Ada");
    }

    #[test]
    fn participant_map_matches_participant_ids() {
        let ids = ["me", "a", "b", "c"];
        let (mut view, _) = ConversationView::mount(conversation(None, &ids));

        let users: Vec<User> =
            ids.iter().map(|id| User::new(*id, format!("Name {id}"))).collect();
        let _ = view.on_participants_loaded(users, &session());

        let mut keys: Vec<_> = view.participants().keys().map(UserId::as_str).collect();
        keys.sort_unstable();
        let mut expected = ids.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[test]
    fn typing_line_empty_without_unmatched_begin() {
        let (mut view, _) = ConversationView::mount(conversation(None, &["me", "other"]));
        let _ = view
            .on_participants_loaded(vec![User::new("me", "Me"), User::new("other", "Ada")], &session());

        assert_eq!(view.typing_line(&session()), "");

        let _ = view.on_typing(&typing("user/other", TypingPhase::Begin));
        assert_eq!(view.typing_line(&session()), "Ada is typing...");

        let _ = view.on_typing(&typing("user/other", TypingPhase::Finish));
        assert_eq!(view.typing_line(&session()), "");
    }

    #[test]
    fn own_typing_never_shows_in_line() {
        let (mut view, _) = ConversationView::mount(conversation(None, &["me", "other"]));
        let _ = view
            .on_participants_loaded(vec![User::new("me", "Me"), User::new("other", "Ada")], &session());

        let _ = view.on_typing(&typing("user/me", TypingPhase::Begin));
        assert_eq!(view.typing_line(&session()), "");
    }

    #[test]
    fn typing_for_unknown_user_is_ignored() {
        let (mut view, _) = ConversationView::mount(conversation(None, &["me", "other"]));
        let _ = view
            .on_participants_loaded(vec![User::new("me", "Me"), User::new("other", "Ada")], &session());

        let _ = view.on_typing(&typing("user/stranger", TypingPhase::Begin));
        let _ = view.on_typing(&typing("malformed-key", TypingPhase::Begin));
        assert_eq!(view.typing_line(&session()), "");
    }

    #[test]
    fn empty_compose_emits_nothing() {
        let (view, _) = ConversationView::mount(conversation(None, &["me", "other"]));

        assert!(view.compose("").is_empty());
        assert!(view.feed().is_empty());
    }

    #[test]
    fn compose_requests_post_and_touch() {
        let (view, _) = ConversationView::mount(conversation(None, &["me", "other"]));

        let actions = view.compose("hello");
        assert!(matches!(actions.as_slice(), [
            AppAction::PostMessage { body, .. },
            AppAction::TouchConversation { .. },
            AppAction::Render,
        ] if body == "hello"));

        // Feed unchanged until the create completes
        assert!(view.feed().is_empty());
    }

    #[test]
    fn posted_message_appends_once() {
        let (mut view, _) = ConversationView::mount(conversation(None, &["me", "other"]));

        let m = message("m1", "hello");
        let _ = view.on_message(m.clone());
        // Echo from the change subscription dedups by id
        let _ = view.on_message(m);

        assert_eq!(view.feed().len(), 1);
    }

    #[test]
    fn message_for_other_conversation_is_dropped() {
        let (mut view, _) = ConversationView::mount(conversation(None, &["me", "other"]));

        let mut foreign = message("m1", "hello");
        foreign.conversation_id = ConversationId::new("conv-2");
        assert!(view.on_message(foreign).is_empty());
        assert!(view.feed().is_empty());
    }

    #[test]
    fn unmount_releases_subscriptions() {
        let (view, _) = ConversationView::mount(conversation(None, &["me", "other"]));

        let actions = view.unmount();
        assert!(matches!(actions.as_slice(), [AppAction::Unsubscribe { conversation_id }]
            if conversation_id.as_str() == "conv-1"));
    }
}
