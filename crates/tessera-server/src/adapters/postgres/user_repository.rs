//! PostgreSQL implementation of UserRepository

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tessera::{DomainError, Email, NewUser, PageRequest, User, UserId, UserName, UserRepository};

const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Unique index backing the one-account-per-email rule
const EMAIL_UNIQUE_INDEX: &str = "users_email_key";

const USER_COLUMNS: &str = "id, name, email, is_active, created_at, updated_at, version";

/// PostgreSQL implementation of UserRepository
///
/// Every operation is a single statement, so each one is atomic. Statements
/// that outlive the configured deadline are dropped (which aborts them) and
/// reported as a repository error.
pub struct PgUserRepository {
    pool: PgPool,
    statement_timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_STATEMENT_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    async fn run<T, F>(&self, operation: &str, query: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.statement_timeout, query).await {
            Ok(result) => result.map_err(|e| map_sqlx_error(operation, e)),
            Err(_) => {
                tracing::warn!(
                    "users.{} exceeded {:?} deadline",
                    operation,
                    self.statement_timeout
                );
                Err(DomainError::Repository(format!(
                    "users.{operation} timed out after {:?}",
                    self.statement_timeout
                )))
            }
        }
    }
}

fn map_sqlx_error(operation: &str, error: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() && db.constraint() == Some(EMAIL_UNIQUE_INDEX) {
            return DomainError::Conflict("email is already registered".to_string());
        }
    }
    tracing::error!("users.{} failed: {}", operation, error);
    DomainError::Repository(error.to_string())
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    version: i64,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupt = |e: DomainError| {
            DomainError::Repository(format!("stored user {} is invalid: {}", row.id, e))
        };

        Ok(User::from_parts(
            UserId::from(row.id),
            UserName::parse(&row.name).map_err(corrupt)?,
            Email::parse(&row.email).map_err(corrupt)?,
            row.is_active,
            row.created_at,
            row.updated_at,
            row.version,
        ))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = self
            .run(
                "find_by_id",
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(id.as_uuid())
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = self
            .run(
                "find_by_email",
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(email.as_str())
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = self
            .run(
                "create",
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(user.name().as_str())
                    .bind(user.email().as_str())
                    .bind(user.is_active())
                    .bind(user.created_at())
                    .bind(user.updated_at())
                    .fetch_one(&self.pool),
            )
            .await?;

        row.try_into()
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, is_active = $4, updated_at = $5, version = version + 1
            WHERE id = $1 AND version = $6
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = self
            .run(
                "update",
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(user.id().as_uuid())
                    .bind(user.name().as_str())
                    .bind(user.email().as_str())
                    .bind(user.is_active())
                    .bind(user.updated_at())
                    .bind(user.version())
                    .fetch_optional(&self.pool),
            )
            .await?;

        if let Some(row) = row {
            return row.try_into();
        }

        // Nothing matched: either the user is gone or the version moved on
        let current = self
            .run(
                "update",
                sqlx::query_scalar::<_, i64>("SELECT version FROM users WHERE id = $1")
                    .bind(user.id().as_uuid())
                    .fetch_optional(&self.pool),
            )
            .await?;

        match current {
            None => Err(DomainError::not_found("User", user.id())),
            Some(found) => Err(DomainError::Conflict(format!(
                "User {} was modified concurrently (expected version {}, found {})",
                user.id(),
                user.version(),
                found
            ))),
        }
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, DomainError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, seq ASC LIMIT $1 OFFSET $2"
        );
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = self
            .run(
                "list",
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(i64::from(page.limit()))
                    .bind(offset)
                    .fetch_all(&self.pool),
            )
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let result = self
            .run(
                "delete",
                sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(id.as_uuid())
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count = self
            .run(
                "count",
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&self.pool),
            )
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
