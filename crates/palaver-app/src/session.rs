//! Explicit session injection.
//!
//! The current user is passed into each view instead of being read from an
//! ambient SDK-managed global.

use palaver_core::{User, UserId};

/// The authenticated user driving this client instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
}

impl Session {
    /// Create a session for the given user.
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// The session user's record.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The session user's identifier.
    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}
