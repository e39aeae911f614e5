//! User Application Service (Use Case)
//!
//! Orchestrates domain operations for User management. Every public method
//! is one use case: check preconditions, mutate through entity methods,
//! delegate persistence to the injected repository, return a projection.

use std::sync::Arc;

use chrono::Utc;

use crate::application::commands::{CreateUser, UpdateUser};
use crate::application::views::{UserPage, UserView};
use crate::domain::{DomainError, NewUser, PageRequest, User, UserId};
use crate::ports::UserRepository;

/// Application service for User operations
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    async fn fetch(&self, id: UserId) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Create a new User
    pub async fn create(&self, cmd: CreateUser) -> Result<UserView, DomainError> {
        if self.repo.find_by_email(&cmd.email).await?.is_some() {
            tracing::debug!("Rejected duplicate email on create: {}", cmd.email);
            return Err(DomainError::Conflict(format!(
                "email {} is already registered",
                cmd.email
            )));
        }

        let user = NewUser::new(cmd.name, cmd.email, Utc::now());
        let saved = self.repo.create(user).await?;

        tracing::info!("Created User: {} ({})", saved.name(), saved.id());

        Ok(UserView::from(&saved))
    }

    /// Get a User by ID
    pub async fn get_by_id(&self, id: UserId) -> Result<UserView, DomainError> {
        let user = self.fetch(id).await?;
        Ok(UserView::from(&user))
    }

    /// List Users in creation order
    pub async fn list(&self, page: PageRequest) -> Result<UserPage, DomainError> {
        let users = self.repo.list(page).await?;
        let total = self.repo.count().await?;

        Ok(UserPage {
            items: users.iter().map(UserView::from).collect(),
            offset: page.offset(),
            limit: page.limit(),
            total,
        })
    }

    /// Update a User's name and/or email
    pub async fn update(&self, id: UserId, cmd: UpdateUser) -> Result<UserView, DomainError> {
        let mut user = self.fetch(id).await?;
        let now = Utc::now();
        let mut changed = false;

        if let Some(name) = cmd.name {
            changed |= user.rename(name, now)?;
        }

        if let Some(email) = cmd.email {
            if user.change_email(email, now)? {
                if let Some(owner) = self.repo.find_by_email(user.email()).await? {
                    if owner.id() != id {
                        tracing::debug!("Rejected email change for {}: address taken", id);
                        return Err(DomainError::Conflict(format!(
                            "email {} is already registered",
                            user.email()
                        )));
                    }
                }
                changed = true;
            }
        }

        if !changed {
            return Ok(UserView::from(&user));
        }

        let saved = self.repo.update(&user).await?;
        tracing::info!("Updated User: {} ({})", saved.name(), saved.id());

        Ok(UserView::from(&saved))
    }

    /// Deactivate a User. Deactivating an inactive User is a no-op.
    pub async fn deactivate(&self, id: UserId) -> Result<UserView, DomainError> {
        let mut user = self.fetch(id).await?;

        if !user.deactivate(Utc::now()) {
            tracing::debug!("User {} already deactivated", id);
            return Ok(UserView::from(&user));
        }

        let saved = self.repo.update(&user).await?;
        tracing::info!("Deactivated User: {}", id);

        Ok(UserView::from(&saved))
    }

    /// Reactivate a User. Activating an active User is a no-op.
    pub async fn activate(&self, id: UserId) -> Result<UserView, DomainError> {
        let mut user = self.fetch(id).await?;

        if !user.activate(Utc::now()) {
            tracing::debug!("User {} already active", id);
            return Ok(UserView::from(&user));
        }

        let saved = self.repo.update(&user).await?;
        tracing::info!("Activated User: {}", id);

        Ok(UserView::from(&saved))
    }

    /// Delete a User
    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::not_found("User", id));
        }

        tracing::info!("Deleted User: {}", id);
        Ok(())
    }
}
