//! In-memory implementation of UserRepository
//!
//! Backs tests and storage-less deployments. Each operation takes the store
//! lock once, so uniqueness checks and writes are atomic.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::{DomainError, Email, NewUser, PageRequest, User, UserId};
use crate::ports::UserRepository;

/// In-memory User store, kept in insertion order
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<User>>, DomainError> {
        self.users
            .read()
            .map_err(|_| DomainError::Repository("user store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<User>>, DomainError> {
        self.users
            .write()
            .map_err(|_| DomainError::Repository("user store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.read()?.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        Ok(self.read()?.iter().find(|u| u.email() == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.write()?;

        if users.iter().any(|u| u.email() == user.email()) {
            return Err(DomainError::Conflict(format!(
                "email {} is already registered",
                user.email()
            )));
        }

        let mut id = UserId::generate();
        while users.iter().any(|u| u.id() == id) {
            id = UserId::generate();
        }

        let stored = User::from_new(id, user);
        users.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.write()?;

        let index = users
            .iter()
            .position(|u| u.id() == user.id())
            .ok_or_else(|| DomainError::not_found("User", user.id()))?;

        if users[index].version() != user.version() {
            return Err(DomainError::Conflict(format!(
                "User {} was modified concurrently (expected version {}, found {})",
                user.id(),
                user.version(),
                users[index].version()
            )));
        }

        if users
            .iter()
            .any(|u| u.id() != user.id() && u.email() == user.email())
        {
            return Err(DomainError::Conflict(format!(
                "email {} is already registered",
                user.email()
            )));
        }

        let stored = user.next_version();
        users[index] = stored.clone();
        Ok(stored)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, DomainError> {
        let mut users = self.read()?.clone();
        // Stable sort: equal timestamps keep insertion order
        users.sort_by_key(|u| u.created_at());

        Ok(users
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit() as usize)
            .collect())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut users = self.write()?;
        let before = users.len();
        users.retain(|u| u.id() != id);
        Ok(users.len() < before)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.read()?.len() as u64)
    }
}
