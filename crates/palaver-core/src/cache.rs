//! Memoizing user-record loader.
//!
//! User records are immutable for the lifetime of a session, so lookups are
//! cached forever. [`UserCache::load_many`] resolves all missing records
//! concurrently, which is how a conversation view loads its participant set
//! on mount.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures::future;

use crate::{
    error::ServiceError,
    model::{User, UserId},
    service::ChatService,
};

/// Shared user-record cache.
///
/// Cloning is cheap; clones share the same underlying map so records loaded
/// by one task are visible to every holder.
#[derive(Debug, Clone, Default)]
pub struct UserCache {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl UserCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached record for a user, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock).
    #[allow(clippy::expect_used)]
    pub fn get(&self, user_id: &UserId) -> Option<User> {
        self.users.lock().expect("Mutex poisoned").get(user_id).cloned()
    }

    /// Insert a record directly, e.g. the session user.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn insert(&self, user: User) {
        self.users.lock().expect("Mutex poisoned").insert(user.id.clone(), user);
    }

    /// Load one record, hitting the service only on a cache miss.
    pub async fn load(
        &self,
        service: &dyn ChatService,
        user_id: &UserId,
    ) -> Result<User, ServiceError> {
        if let Some(user) = self.get(user_id) {
            return Ok(user);
        }

        let user = service.fetch_user(user_id).await?;
        self.insert(user.clone());
        Ok(user)
    }

    /// Load many records, fetching all misses concurrently.
    ///
    /// The result preserves the order of `user_ids`.
    pub async fn load_many(
        &self,
        service: &dyn ChatService,
        user_ids: &[UserId],
    ) -> Result<Vec<User>, ServiceError> {
        let missing: Vec<UserId> =
            user_ids.iter().filter(|id| self.get(id).is_none()).cloned().collect();

        let fetched =
            future::try_join_all(missing.iter().map(|id| service.fetch_user(id))).await?;
        for user in fetched {
            self.insert(user);
        }

        user_ids
            .iter()
            .map(|id| {
                self.get(id).ok_or_else(|| ServiceError::UnknownUser { user_id: id.clone() })
            })
            .collect()
    }
}
