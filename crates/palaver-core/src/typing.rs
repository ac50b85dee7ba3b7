//! Typing-indicator events and the keystroke debouncer.
//!
//! The service delivers typing events keyed by composite identifiers of the
//! form `user/<id>`; consumers extract the id suffix. On the sending side,
//! [`TypingDetector`] turns a stream of keystrokes into at most one `begin`
//! per burst and a `finish` once the keyboard has been quiet for
//! [`TYPING_QUIET_PERIOD`].

use std::{ops::Sub, time::Duration};

use crate::model::{ConversationId, UserId};

/// Keyboard quiet period after which a typing burst is considered finished.
pub const TYPING_QUIET_PERIOD: Duration = Duration::from_secs(3);

/// Phase of a typing indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    /// The user started typing.
    Begin,
    /// The user stopped typing.
    Finish,
}

impl TypingPhase {
    /// Parse a wire phase name. Unknown phases yield `None` and are ignored
    /// by consumers.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "begin" => Some(Self::Begin),
            "finish" => Some(Self::Finish),
            _ => None,
        }
    }

    /// Wire name of this phase.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Finish => "finish",
        }
    }
}

/// A typing-indicator event for one conversation.
///
/// Entries are keyed by the service's composite identifier (`user/<id>`),
/// not by the bare user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingEvent {
    /// Conversation the event belongs to.
    pub conversation_id: ConversationId,
    /// Composite key to phase, one entry per user covered by the event.
    pub entries: Vec<(String, TypingPhase)>,
}

impl TypingEvent {
    /// Build the composite key the service uses for a user.
    pub fn composite_key(user_id: &UserId) -> String {
        format!("user/{user_id}")
    }
}

/// Debounces keystrokes into typing-indicator phases.
///
/// Generic over the instant type so the same logic runs against real and
/// virtual clocks.
#[derive(Debug, Clone, Default)]
pub struct TypingDetector<I> {
    last_input: Option<I>,
}

impl<I> TypingDetector<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create an idle detector.
    pub fn new() -> Self {
        Self { last_input: None }
    }

    /// Record a keystroke. Returns `Begin` on the first keystroke of a
    /// burst, `None` while a burst is already active.
    pub fn record_input(&mut self, now: I) -> Option<TypingPhase> {
        let was_idle = self.last_input.is_none();
        self.last_input = Some(now);
        was_idle.then_some(TypingPhase::Begin)
    }

    /// Check for burst expiry. Returns `Finish` once the quiet period has
    /// elapsed since the last keystroke.
    pub fn poll(&mut self, now: I) -> Option<TypingPhase> {
        match self.last_input {
            Some(last) if now >= last && now - last >= TYPING_QUIET_PERIOD => {
                self.last_input = None;
                Some(TypingPhase::Finish)
            },
            _ => None,
        }
    }

    /// Force the current burst to finish, if one is active. Used when the
    /// composer goes away before the quiet period elapses.
    pub fn flush(&mut self) -> Option<TypingPhase> {
        self.last_input.take().map(|_| TypingPhase::Finish)
    }

    /// Whether a typing burst is currently active.
    pub fn is_active(&self) -> bool {
        self.last_input.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn first_keystroke_begins_burst() {
        let mut detector = TypingDetector::new();
        let now = Instant::now();

        assert_eq!(detector.record_input(now), Some(TypingPhase::Begin));
        assert_eq!(detector.record_input(now + Duration::from_millis(100)), None);
        assert!(detector.is_active());
    }

    #[test]
    fn quiet_period_finishes_burst() {
        let mut detector = TypingDetector::new();
        let start = Instant::now();

        let _ = detector.record_input(start);
        assert_eq!(detector.poll(start + Duration::from_secs(1)), None);
        assert_eq!(detector.poll(start + TYPING_QUIET_PERIOD), Some(TypingPhase::Finish));
        assert!(!detector.is_active());

        // Idle detector stays quiet
        assert_eq!(detector.poll(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn keystrokes_extend_the_burst() {
        let mut detector = TypingDetector::new();
        let start = Instant::now();

        let _ = detector.record_input(start);
        let _ = detector.record_input(start + Duration::from_secs(2));

        // Quiet period is measured from the most recent keystroke
        assert_eq!(detector.poll(start + Duration::from_secs(3)), None);
        assert_eq!(detector.poll(start + Duration::from_secs(5)), Some(TypingPhase::Finish));
    }

    #[test]
    fn flush_finishes_active_burst_only() {
        let mut detector = TypingDetector::new();
        assert_eq!(detector.flush(), None);

        let _ = detector.record_input(Instant::now());
        assert_eq!(detector.flush(), Some(TypingPhase::Finish));
        assert_eq!(detector.flush(), None);
    }

    #[test]
    fn phase_wire_names_round_trip() {
        assert_eq!(TypingPhase::parse("begin"), Some(TypingPhase::Begin));
        assert_eq!(TypingPhase::parse("finish"), Some(TypingPhase::Finish));
        assert_eq!(TypingPhase::parse("pause"), None);
        assert_eq!(TypingPhase::Begin.as_str(), "begin");
    }

    #[test]
    fn composite_key_prefixes_user_id() {
        assert_eq!(TypingEvent::composite_key(&UserId::new("user-3")), "user/user-3");
    }
}
