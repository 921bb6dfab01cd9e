use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use crate::db::dates;
use crate::db::error::StoreError;
use crate::db::models::{Exercise, LogEntry, NewExercise, NewUser, User};

/// Opens the record store. File databases are created on first use; an
/// in-memory database is pinned to a single connection that never expires,
/// otherwise every pooled connection would see its own empty database.
pub async fn connect(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);

    let pool_options = if is_in_memory(db_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options.connect_with(options).await
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exercises (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            description TEXT NOT NULL,
            duration REAL NOT NULL,
            date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS exercises_user_date ON exercises (user_id, date)")
        .execute(pool)
        .await?;

    Ok(())
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Identifiers are 32 lowercase hex digits. Anything else is a cast failure,
/// not a missing record.
fn check_id(raw: &str) -> Result<(), StoreError> {
    match Uuid::try_parse(raw) {
        Ok(id) if id.simple().to_string() == raw => Ok(()),
        _ => Err(StoreError::cast("ObjectId", "_id", raw)),
    }
}

/// Something that can be written to the store as a new record.
pub trait Document {
    type Persisted;

    fn insert(
        self,
        pool: &SqlitePool,
    ) -> impl Future<Output = Result<Self::Persisted, StoreError>> + Send;
}

impl Document for NewUser {
    type Persisted = User;

    async fn insert(self, pool: &SqlitePool) -> Result<User, StoreError> {
        let user = User {
            id: new_id(),
            username: self.validate()?,
        };

        sqlx::query("INSERT INTO users (id, username) VALUES (?, ?)")
            .bind(&user.id)
            .bind(&user.username)
            .execute(pool)
            .await?;

        Ok(user)
    }
}

impl Document for NewExercise {
    type Persisted = Exercise;

    async fn insert(self, pool: &SqlitePool) -> Result<Exercise, StoreError> {
        let valid = self.validate()?;
        let exercise = Exercise {
            id: new_id(),
            user_id: valid.user_id,
            description: valid.description,
            duration: valid.duration,
            date: valid.date,
        };

        sqlx::query(
            r#"
            INSERT INTO exercises (id, user_id, description, duration, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&exercise.id)
        .bind(&exercise.user_id)
        .bind(&exercise.description)
        .bind(exercise.duration)
        .bind(exercise.date)
        .execute(pool)
        .await?;

        Ok(exercise)
    }
}

/// Thin pass-through over the store. Every failure comes back as a
/// `StoreError`; nothing is retried.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert<D: Document>(&self, document: D) -> Result<D::Persisted, StoreError> {
        document.insert(&self.pool).await
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        check_id(id)?;

        let user = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT id, username FROM users")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Exercises of `user_id` dated within `[from, to]`, both ends inclusive.
    ///
    /// Bounds are passed through as the client sent them and coerced here;
    /// a missing or blank `from` means the epoch and a missing or blank `to`
    /// means today. A bound that is not a date is a `StoreError::Cast`.
    pub async fn list_exercise_log(
        &self,
        user_id: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let from = match non_blank(from) {
            Some(raw) => dates::parse_date(raw).ok_or_else(|| StoreError::cast("date", "date", raw))?,
            None => dates::epoch(),
        };
        let to = match non_blank(to) {
            Some(raw) => dates::parse_date(raw).ok_or_else(|| StoreError::cast("date", "date", raw))?,
            None => dates::today(),
        };

        let log = sqlx::query_as::<_, LogEntry>(
            r#"
            SELECT description, duration, date
            FROM exercises
            WHERE user_id = ? AND date >= ? AND date <= ?
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(log)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) async fn test_repository() -> Repository {
    let pool = connect("sqlite::memory:").await.unwrap();
    create_schema(&pool).await.unwrap();
    Repository::new(pool)
}
