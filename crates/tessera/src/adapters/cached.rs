//! Caching decorator for any UserRepository
//!
//! Keeps recently seen Users by id. Writes go through to the inner
//! repository first and the cache is refreshed with the stored result, so a
//! read of an id right after writing it always sees that write.
//!
//! Every completed write bumps a write epoch. A result is only cached when
//! no write completed while its inner call was in flight, so a slow read can
//! never resurrect a User that was updated or deleted meanwhile.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::{DomainError, Email, NewUser, PageRequest, User, UserId};
use crate::ports::UserRepository;

pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Default)]
struct CacheState {
    users: HashMap<UserId, User>,
    epoch: u64,
}

impl CacheState {
    /// Store a User unless a newer version is already cached
    fn insert(&mut self, user: &User, capacity: usize) {
        if capacity == 0 {
            return;
        }

        if let Some(existing) = self.users.get(&user.id()) {
            if existing.version() > user.version() {
                return;
            }
        } else if self.users.len() >= capacity {
            if let Some(victim) = self.users.keys().next().copied() {
                self.users.remove(&victim);
            }
        }

        self.users.insert(user.id(), user.clone());
    }
}

/// Read-through, write-through User cache wrapping another repository
pub struct CachedUserRepository<R: UserRepository + ?Sized> {
    inner: Arc<R>,
    state: RwLock<CacheState>,
    capacity: usize,
}

impl<R: UserRepository + ?Sized> CachedUserRepository<R> {
    pub fn new(inner: Arc<R>) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// A capacity of zero disables caching entirely
    pub fn with_capacity(inner: Arc<R>, capacity: usize) -> Self {
        Self {
            inner,
            state: RwLock::new(CacheState::default()),
            capacity,
        }
    }

    /// Number of Users currently cached
    pub fn cached_len(&self) -> usize {
        self.state.read().map(|s| s.users.len()).unwrap_or(0)
    }

    fn cached(&self, id: UserId) -> Option<User> {
        self.state.read().ok()?.users.get(&id).cloned()
    }

    fn epoch(&self) -> u64 {
        self.state.read().map(|s| s.epoch).unwrap_or(u64::MAX)
    }

    /// Cache a User read from the inner repository at `seen`
    fn fill(&self, user: &User, seen: u64) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        if state.epoch != seen {
            tracing::trace!("Skipped cache fill for {}: written meanwhile", user.id());
            return;
        }
        state.insert(user, self.capacity);
    }

    /// Record a completed write of `id` that started at `seen`. The stored
    /// User is cached only when no other write overlapped this one.
    fn settle(&self, id: UserId, seen: u64, stored: Option<&User>) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        let overlapped = state.epoch != seen;
        state.epoch = state.epoch.wrapping_add(1);

        match stored {
            Some(user) if !overlapped => state.insert(user, self.capacity),
            _ => {
                state.users.remove(&id);
            }
        }
    }
}

#[async_trait]
impl<R: UserRepository + ?Sized> UserRepository for CachedUserRepository<R> {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        if let Some(user) = self.cached(id) {
            tracing::trace!("User cache hit: {}", id);
            return Ok(Some(user));
        }

        let seen = self.epoch();
        let found = self.inner.find_by_id(id).await?;
        if let Some(user) = &found {
            self.fill(user, seen);
        }
        Ok(found)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let seen = self.epoch();
        let found = self.inner.find_by_email(email).await?;
        if let Some(user) = &found {
            self.fill(user, seen);
        }
        Ok(found)
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let seen = self.epoch();
        let stored = self.inner.create(user).await?;
        self.settle(stored.id(), seen, Some(&stored));
        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let seen = self.epoch();
        let result = self.inner.update(user).await;
        // On failure the cached copy may be what made the caller's version stale
        self.settle(user.id(), seen, result.as_ref().ok());
        result
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, DomainError> {
        self.inner.list(page).await
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let seen = self.epoch();
        let deleted = self.inner.delete(id).await;
        self.settle(id, seen, None);
        deleted
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.inner.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryUserRepository;
    use crate::domain::UserName;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    /// Inner repository that can hold reads and updates open after they
    /// have touched the store, until released
    #[derive(Default)]
    struct GatedRepository {
        store: InMemoryUserRepository,
        gated: AtomicBool,
        reached: Notify,
        release: Notify,
    }

    impl GatedRepository {
        async fn hold(&self) {
            if self.gated.swap(false, Ordering::SeqCst) {
                self.reached.notify_one();
                self.release.notified().await;
            }
        }
    }

    #[async_trait]
    impl UserRepository for GatedRepository {
        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
            let found = self.store.find_by_id(id).await;
            self.hold().await;
            found
        }

        async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
            self.store.find_by_email(email).await
        }

        async fn create(&self, user: NewUser) -> Result<User, DomainError> {
            self.store.create(user).await
        }

        async fn update(&self, user: &User) -> Result<User, DomainError> {
            let stored = self.store.update(user).await;
            self.hold().await;
            stored
        }

        async fn list(&self, page: PageRequest) -> Result<Vec<User>, DomainError> {
            self.store.list(page).await
        }

        async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
            self.store.delete(id).await
        }

        async fn count(&self) -> Result<u64, DomainError> {
            self.store.count().await
        }
    }

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser::new(
            UserName::parse(name).unwrap(),
            Email::parse(email).unwrap(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_read_after_write_sees_update() {
        let inner = Arc::new(InMemoryUserRepository::new());
        let cache = CachedUserRepository::new(Arc::clone(&inner));

        let mut user = cache.create(new_user("A", "a@example.com")).await.unwrap();
        assert_eq!(cache.cached_len(), 1);

        user.deactivate(Utc::now());
        let stored = cache.update(&user).await.unwrap();

        let read = cache.find_by_id(stored.id()).await.unwrap().unwrap();
        assert!(!read.is_active());
        assert_eq!(read.version(), 2);
    }

    #[tokio::test]
    async fn test_delete_evicts() {
        let inner = Arc::new(InMemoryUserRepository::new());
        let cache = CachedUserRepository::new(Arc::clone(&inner));

        let user = cache.create(new_user("A", "a@example.com")).await.unwrap();
        assert!(cache.delete(user.id()).await.unwrap());

        assert_eq!(cache.cached_len(), 0);
        assert!(cache.find_by_id(user.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let inner = Arc::new(InMemoryUserRepository::new());
        let cache = CachedUserRepository::new(Arc::clone(&inner));

        assert!(cache.find_by_id(UserId::generate()).await.unwrap().is_none());
        assert_eq!(cache.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_capacity_is_respected() {
        let inner = Arc::new(InMemoryUserRepository::new());
        let cache = CachedUserRepository::with_capacity(Arc::clone(&inner), 2);

        for i in 0..4 {
            cache
                .create(new_user(&format!("U{i}"), &format!("u{i}@example.com")))
                .await
                .unwrap();
        }
        assert_eq!(cache.cached_len(), 2);

        let disabled = CachedUserRepository::with_capacity(inner, 0);
        disabled.create(new_user("Z", "z@example.com")).await.unwrap();
        assert_eq!(disabled.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_stale_update_drops_cached_copy() {
        let inner = Arc::new(InMemoryUserRepository::new());
        let cache = CachedUserRepository::new(Arc::clone(&inner));
        let user = cache.create(new_user("A", "a@example.com")).await.unwrap();

        // Another writer bypasses the cache
        let mut behind_our_back = user.clone();
        behind_our_back.rename(UserName::parse("B").unwrap(), Utc::now()).unwrap();
        inner.update(&behind_our_back).await.unwrap();

        let mut ours = cache.find_by_id(user.id()).await.unwrap().unwrap();
        ours.rename(UserName::parse("C").unwrap(), Utc::now()).unwrap();
        assert!(cache.update(&ours).await.unwrap_err().is_conflict());

        let fresh = cache.find_by_id(user.id()).await.unwrap().unwrap();
        assert_eq!(fresh.name().as_str(), "B");
    }

    #[tokio::test]
    async fn test_read_racing_delete_does_not_resurrect_user() {
        let inner = Arc::new(GatedRepository::default());
        let cache = Arc::new(CachedUserRepository::new(Arc::clone(&inner)));
        let user = inner.store.create(new_user("Ada", "ada@example.com")).await.unwrap();
        let id = user.id();

        inner.gated.store(true, Ordering::SeqCst);
        let reader = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.find_by_id(id).await }
        });
        inner.reached.notified().await;

        assert!(cache.delete(id).await.unwrap());
        inner.release.notify_one();

        // The read began before the delete, so it still returns the User
        assert!(reader.await.unwrap().unwrap().is_some());

        assert_eq!(cache.cached_len(), 0);
        assert!(cache.find_by_id(id).await.unwrap().is_none());
        assert!(!cache.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_racing_delete_is_not_cached() {
        let inner = Arc::new(GatedRepository::default());
        let cache = Arc::new(CachedUserRepository::new(Arc::clone(&inner)));
        let mut user = inner.store.create(new_user("Ada", "ada@example.com")).await.unwrap();
        let id = user.id();
        user.deactivate(Utc::now());

        inner.gated.store(true, Ordering::SeqCst);
        let writer = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.update(&user).await }
        });
        inner.reached.notified().await;

        assert!(cache.delete(id).await.unwrap());
        inner.release.notify_one();

        assert_eq!(writer.await.unwrap().unwrap().version(), 2);
        assert!(cache.find_by_id(id).await.unwrap().is_none());
    }
}
