//! User - Account identity and lifecycle
//!
//! Pure domain entity without infrastructure dependencies.
//!
//! A User exists in two shapes:
//! - [`NewUser`]: built in memory, not yet persisted, carries no id
//! - [`User`]: returned by a repository, carries a permanent id and a version

use chrono::{DateTime, Utc};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{Email, UserId, UserName};

/// A User that has not been handed to a repository yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: UserName,
    email: Email,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NewUser {
    /// Create an active user stamped with `now`
    pub fn new(name: UserName, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            name,
            email,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// A persisted User
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: Email,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Optimistic concurrency token, bumped by the repository on every update
    version: i64,
}

impl User {
    /// Attach a store-assigned id to a fresh user (first version)
    pub fn from_new(id: UserId, new: NewUser) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            is_active: new.is_active,
            created_at: new.created_at,
            updated_at: new.updated_at,
            version: 1,
        }
    }

    /// Rehydrate a stored user. Only persistence adapters should need this.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        name: UserName,
        email: Email,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        version: i64,
    ) -> Self {
        Self {
            id,
            name,
            email,
            is_active,
            created_at,
            updated_at,
            version,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Copy of this user as stored after a successful update
    pub fn next_version(&self) -> Self {
        Self {
            version: self.version + 1,
            ..self.clone()
        }
    }

    fn ensure_mutable(&self) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::Conflict(format!(
                "User {} is deactivated and cannot be modified",
                self.id
            )));
        }
        Ok(())
    }

    /// Change the display name. Returns whether anything changed.
    pub fn rename(&mut self, name: UserName, now: DateTime<Utc>) -> Result<bool, DomainError> {
        self.ensure_mutable()?;
        if self.name == name {
            return Ok(false);
        }
        self.name = name;
        self.updated_at = now;
        Ok(true)
    }

    /// Change the email address. Uniqueness is the caller's concern.
    pub fn change_email(&mut self, email: Email, now: DateTime<Utc>) -> Result<bool, DomainError> {
        self.ensure_mutable()?;
        if self.email == email {
            return Ok(false);
        }
        self.email = email;
        self.updated_at = now;
        Ok(true)
    }

    /// Deactivate the user. Deactivating twice is a no-op.
    pub fn deactivate(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_active = false;
        self.updated_at = now;
        true
    }

    /// Reactivate the user. Activating an active user is a no-op.
    pub fn activate(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_active {
            return false;
        }
        self.is_active = true;
        self.updated_at = now;
        true
    }
}
