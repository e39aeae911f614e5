//! User Repository Port
//!
//! Abstract interface for User persistence operations.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Email, NewUser, PageRequest, User, UserId};

/// Repository interface for User entities
///
/// Implementations must be interchangeable: the application layer only ever
/// sees this trait. Storage-specific failures are reported as
/// [`DomainError::Repository`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a User by ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Find a User by its (normalized) email
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError>;

    /// Persist a new User and assign its id.
    ///
    /// Fails with `Conflict` if the email is already taken.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Persist changes to an existing User.
    ///
    /// The write only succeeds if the stored version equals `user.version()`;
    /// the returned User carries the bumped version. Fails with `NotFound`
    /// if the id does not exist and `Conflict` on a stale version or an
    /// email already taken by another User.
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// List Users ordered by creation time (insertion order for ties)
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, DomainError>;

    /// Delete a User by ID. Returns whether anything was removed.
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;

    /// Count all stored Users
    async fn count(&self) -> Result<u64, DomainError>;
}
