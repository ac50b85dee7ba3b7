//! Async runtime
//!
//! Event loop that drives terminal I/O and executes the actions produced by
//! the [`App`] state machine against a [`ChatService`]. Uses tokio::select!
//! to handle terminal events, completed remote operations, and the periodic
//! tick concurrently.
//!
//! Remote operations run as spawned tasks that report back through an
//! unbounded event channel; nothing is cancelled on unmount except the two
//! per-conversation subscription forwarders.

use std::{
    collections::HashMap,
    io::{self, stdout},
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use palaver_app::{App, AppAction, AppEvent};
use palaver_core::{ChatService, ConversationId, TypingDetector, UserCache};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{InputState, KeyInput, ui};

/// Tick period driving typing-burst expiry.
const TICK_PERIOD: Duration = Duration::from_millis(250);

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Forwarder tasks for one subscribed conversation.
struct Subscription {
    messages: JoinHandle<()>,
    typing: JoinHandle<()>,
}

impl Subscription {
    fn abort(&self) {
        self.messages.abort();
        self.typing.abort();
    }
}

/// Async runtime for the TUI.
///
/// Manages terminal setup/teardown, the main event loop, and the execution
/// of remote actions against the chat service.
pub struct Runtime {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    service: Arc<dyn ChatService>,
    cache: UserCache,
    input: InputState,
    detector: TypingDetector<Instant>,
    subscriptions: HashMap<ConversationId, Subscription>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl Runtime {
    /// Create a new runtime, switching the terminal to raw mode.
    pub fn new(app: App, service: Arc<dyn ChatService>) -> Result<Self, RuntimeError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let cache = UserCache::new();
        cache.insert(app.session().user().clone());

        Ok(Self {
            terminal,
            app,
            service,
            cache,
            input: InputState::new(),
            detector: TypingDetector::new(),
            subscriptions: HashMap::new(),
            events_tx,
            events_rx,
        })
    }

    /// Run the main event loop.
    ///
    /// `initial_actions` are actions already produced by the app before the
    /// loop starts, e.g. mounting a seeded conversation.
    pub async fn run(mut self, initial_actions: Vec<AppAction>) -> Result<(), RuntimeError> {
        self.render()?;
        if self.process_actions(initial_actions)? {
            return Ok(());
        }

        let mut event_stream = EventStream::new();
        let mut tick_interval = tokio::time::interval(TICK_PERIOD);

        loop {
            let should_quit = tokio::select! {
                // Terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event)?,
                        Some(Err(e)) => return Err(RuntimeError::Io(e)),
                        None => true,
                    }
                }

                // Completed remote operations and subscription events
                Some(event) = self.events_rx.recv() => {
                    let actions = self.app.handle(event);
                    self.process_actions(actions)?
                }

                // Periodic tick
                _ = tick_interval.tick() => {
                    let mut actions = self.app.handle(AppEvent::Tick);
                    if let Some(phase) = self.detector.poll(Instant::now()) {
                        actions.extend(self.app.publish_typing(phase));
                    }
                    self.process_actions(actions)?
                }
            };

            if should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle a terminal event and return whether to quit.
    fn handle_terminal_event(&mut self, event: Event) -> Result<bool, RuntimeError> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(input) = map_key(key.code) else {
                    return Ok(false);
                };

                let mut actions = self.input.handle_key(input, &mut self.app);
                actions.extend(self.track_typing(input));
                self.process_actions(actions)
            },
            Event::Resize(cols, rows) => {
                let actions = self.app.resize(cols, rows);
                self.process_actions(actions)
            },
            _ => Ok(false),
        }
    }

    /// Feed composer keystrokes into the typing detector.
    ///
    /// Slash commands are not typing; sending the message flushes the burst
    /// immediately rather than waiting out the quiet period.
    fn track_typing(&mut self, input: KeyInput) -> Vec<AppAction> {
        if self.app.dialog().is_some() || self.app.view().is_none() {
            return vec![];
        }

        let phase = match input {
            KeyInput::Char(_) | KeyInput::Backspace | KeyInput::Delete
                if !self.input.buffer().starts_with('/') =>
            {
                self.detector.record_input(Instant::now())
            },
            KeyInput::Enter => self.detector.flush(),
            _ => None,
        };

        match phase {
            Some(phase) => self.app.publish_typing(phase),
            None => vec![],
        }
    }

    /// Process actions returned by the app. Returns true if should quit.
    ///
    /// Uses iterative processing to avoid recursion between actions and
    /// events.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, RuntimeError> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.render()?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Subscribe { conversation_id } => {
                        self.subscribe(&conversation_id);
                    },
                    AppAction::Unsubscribe { conversation_id } => {
                        if let Some(subscription) = self.subscriptions.remove(&conversation_id) {
                            subscription.abort();
                        }
                    },
                    AppAction::LoadHistory { conversation_id } => {
                        let service = Arc::clone(&self.service);
                        let tx = self.events_tx.clone();
                        drop(tokio::spawn(async move {
                            match service.fetch_messages(&conversation_id).await {
                                Ok(messages) => {
                                    let _ = tx
                                        .send(AppEvent::HistoryLoaded { conversation_id, messages });
                                },
                                Err(e) => tracing::warn!(%conversation_id, error = %e,
                                    "failed to load history"),
                            }
                        }));
                    },
                    AppAction::LoadParticipants { conversation_id, user_ids } => {
                        let service = Arc::clone(&self.service);
                        let cache = self.cache.clone();
                        let tx = self.events_tx.clone();
                        drop(tokio::spawn(async move {
                            match cache.load_many(service.as_ref(), &user_ids).await {
                                Ok(users) => {
                                    let _ = tx
                                        .send(AppEvent::ParticipantsLoaded { conversation_id, users });
                                },
                                Err(e) => tracing::warn!(%conversation_id, error = %e,
                                    "failed to load participants"),
                            }
                        }));
                    },
                    AppAction::PostMessage { conversation_id, body } => {
                        let service = Arc::clone(&self.service);
                        let tx = self.events_tx.clone();
                        let sender_id = self.app.session().user_id().clone();
                        drop(tokio::spawn(async move {
                            match service.create_message(&conversation_id, &sender_id, &body).await
                            {
                                Ok(message) => {
                                    let _ = tx.send(AppEvent::MessagePosted { message });
                                },
                                Err(e) => tracing::warn!(%conversation_id, error = %e,
                                    "failed to post message"),
                            }
                        }));
                    },
                    AppAction::TouchConversation { conversation_id } => {
                        let service = Arc::clone(&self.service);
                        drop(tokio::spawn(async move {
                            if let Err(e) = service.touch_conversation(&conversation_id).await {
                                tracing::debug!(%conversation_id, error = %e,
                                    "conversation touch failed");
                            }
                        }));
                    },
                    AppAction::PublishTyping { conversation_id, phase } => {
                        let service = Arc::clone(&self.service);
                        let sender_id = self.app.session().user_id().clone();
                        drop(tokio::spawn(async move {
                            if let Err(e) =
                                service.publish_typing(&conversation_id, &sender_id, phase).await
                            {
                                tracing::debug!(%conversation_id, error = %e,
                                    "typing publish failed");
                            }
                        }));
                    },
                    AppAction::DiscoverUser { username } => {
                        let service = Arc::clone(&self.service);
                        let tx = self.events_tx.clone();
                        drop(tokio::spawn(async move {
                            let event = match service.discover_user(&username).await {
                                Ok(users) => AppEvent::UsersDiscovered { username, users },
                                Err(e) => AppEvent::RequestFailed { message: e.to_string() },
                            };
                            let _ = tx.send(event);
                        }));
                    },
                    AppAction::CreateDirectConversation { user } => {
                        let service = Arc::clone(&self.service);
                        let tx = self.events_tx.clone();
                        let creator = self.app.session().user_id().clone();
                        drop(tokio::spawn(async move {
                            let event =
                                match service.create_direct_conversation(&creator, &user.id).await
                                {
                                    Ok(conversation) => {
                                        AppEvent::ConversationCreated { conversation }
                                    },
                                    Err(e) => AppEvent::RequestFailed { message: e.to_string() },
                                };
                            let _ = tx.send(event);
                        }));
                    },

                    // Shell-scoped actions never reach the runtime
                    AppAction::CloseDialog | AppAction::AddConversation { .. } => {
                        tracing::warn!(?action, "unexpected shell action in runtime");
                    },
                }
            }

            // Drain events that completed synchronously
            while let Ok(event) = self.events_rx.try_recv() {
                pending_actions.extend(self.app.handle(event));
            }
        }
        Ok(false)
    }

    /// Spawn forwarder tasks for a conversation's two subscriptions.
    fn subscribe(&mut self, conversation_id: &ConversationId) {
        if self.subscriptions.contains_key(conversation_id) {
            return;
        }

        let mut message_rx = self.service.subscribe_messages(conversation_id);
        let tx = self.events_tx.clone();
        let messages = tokio::spawn(async move {
            while let Ok(message) = message_rx.recv().await {
                if tx.send(AppEvent::MessageArrived { message }).is_err() {
                    break;
                }
            }
        });

        let mut typing_rx = self.service.subscribe_typing(conversation_id);
        let tx = self.events_tx.clone();
        let typing = tokio::spawn(async move {
            while let Ok(event) = typing_rx.recv().await {
                if tx.send(AppEvent::Typing { event }).is_err() {
                    break;
                }
            }
        });

        self.subscriptions.insert(conversation_id.clone(), Subscription { messages, typing });
    }

    /// Render the UI.
    fn render(&mut self) -> Result<(), RuntimeError> {
        self.terminal.draw(|frame| {
            ui::render(frame, &self.app, &self.input);
        })?;
        Ok(())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        for subscription in self.subscriptions.values() {
            subscription.abort();
        }

        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

/// Map a crossterm key code to a [`KeyInput`].
fn map_key(code: KeyCode) -> Option<KeyInput> {
    match code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}
