//! Database helpers for accounts and sign records.

use chrono::Utc;
use serde::Serialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::Instrument;
use utoipa::ToSchema;

pub type SqlitePool = Pool<Sqlite>;

/// Bundled DDL, applied at startup. `speech_recordings` is reserved for a
/// future feature and is not touched by any endpoint.
const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS signs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    word TEXT NOT NULL,
    video_url TEXT,
    created_at TEXT NOT NULL,
    UNIQUE(user_id, word),
    FOREIGN KEY (user_id) REFERENCES accounts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS speech_recordings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    transcribed_text TEXT NOT NULL,
    audio_url TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES accounts(id) ON DELETE CASCADE
);
";

/// A registered account. The password field holds a bcrypt hash, never a
/// plaintext password.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// A user-owned sign record, serialized in the camelCase shape the web
/// client expects.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sign {
    pub id: i64,
    pub user_id: i64,
    pub word: String,
    pub video_url: Option<String>,
    pub created_at: String,
}

/// Outcome when attempting to create a new account.
#[derive(Debug)]
pub enum SignupOutcome {
    Created(i64),
    Conflict,
}

/// Outcome when attempting to insert a sign record.
#[derive(Debug)]
pub enum SignInsertOutcome {
    Created(Sign),
    Conflict,
}

/// Connect to the database and apply the schema.
pub async fn connect(dsn: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(dsn)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL statement by
/// statement (sqlx::query does not accept multi-statement strings).
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Look up an account by email (login and per-request token resolution).
pub async fn find_account_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<Account>, sqlx::Error> {
    let query = "SELECT id, email, password FROM accounts WHERE email = ?";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.map(|row| Account {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password"),
    }))
}

/// Insert a new account. The UNIQUE constraint on email is the sole
/// defense against concurrent signups for the same address.
pub async fn insert_account(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
) -> Result<SignupOutcome, sqlx::Error> {
    let query = "INSERT INTO accounts (email, password) VALUES (?, ?) RETURNING id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created(row.get("id"))),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err),
    }
}

/// Insert a sign record for `user_id`. The UNIQUE(user_id, word)
/// constraint rejects duplicates, including concurrent ones.
pub async fn insert_sign(
    pool: &SqlitePool,
    user_id: i64,
    word: &str,
    video_url: &str,
) -> Result<SignInsertOutcome, sqlx::Error> {
    let created_at = Utc::now().to_rfc3339();

    let query =
        "INSERT INTO signs (user_id, word, video_url, created_at) VALUES (?, ?, ?, ?) RETURNING id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .bind(word)
        .bind(video_url)
        .bind(&created_at)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignInsertOutcome::Created(Sign {
            id: row.get("id"),
            user_id,
            word: word.to_string(),
            video_url: Some(video_url.to_string()),
            created_at,
        })),
        Err(err) if is_unique_violation(&err) => Ok(SignInsertOutcome::Conflict),
        Err(err) => Err(err),
    }
}

/// All signs owned by `user_id`, ordered by word ascending.
pub async fn list_signs(pool: &SqlitePool, user_id: i64) -> Result<Vec<Sign>, sqlx::Error> {
    let query =
        "SELECT id, user_id, word, video_url, created_at FROM signs WHERE user_id = ? ORDER BY word ASC";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(pool)
        .instrument(span)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| Sign {
            id: row.get("id"),
            user_id: row.get("user_id"),
            word: row.get("word"),
            video_url: row.get("video_url"),
            created_at: row.get("created_at"),
        })
        .collect())
}

/// Delete a sign only if it exists and is owned by `user_id`. Returns
/// whether a row was deleted; callers must not distinguish "absent" from
/// "owned by someone else".
pub async fn delete_sign(
    pool: &SqlitePool,
    user_id: i64,
    sign_id: i64,
) -> Result<bool, sqlx::Error> {
    let query = "DELETE FROM signs WHERE id = ? AND user_id = ?";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(sign_id)
        .bind(user_id)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// SQLite extended result codes 2067 (SQLITE_CONSTRAINT_UNIQUE) and 1555
/// (SQLITE_CONSTRAINT_PRIMARYKEY).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code.as_ref() == "2067" || code.as_ref() == "1555"),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    async fn test_account(pool: &SqlitePool, email: &str) -> i64 {
        match insert_account(pool, email, "$2b$10$hash").await.unwrap() {
            SignupOutcome::Created(id) => id,
            SignupOutcome::Conflict => panic!("account {email} already exists"),
        }
    }

    #[tokio::test]
    async fn test_insert_account_once_then_conflict() {
        let pool = test_pool().await;

        let outcome = insert_account(&pool, "a@x.com", "$2b$10$hash").await.unwrap();
        assert!(matches!(outcome, SignupOutcome::Created(_)));

        let outcome = insert_account(&pool, "a@x.com", "$2b$10$other").await.unwrap();
        assert!(matches!(outcome, SignupOutcome::Conflict));

        let account = find_account_by_email(&pool, "a@x.com").await.unwrap().unwrap();
        assert_eq!(account.email, "a@x.com");
        assert_eq!(account.password_hash, "$2b$10$hash");
    }

    #[tokio::test]
    async fn test_find_account_missing() {
        let pool = test_pool().await;
        assert!(find_account_by_email(&pool, "nobody@x.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_sign_round_trip() {
        let pool = test_pool().await;
        let owner = test_account(&pool, "a@x.com").await;

        let outcome = insert_sign(&pool, owner, "Hello", "https://example.com/signs/Hello.mp4")
            .await
            .unwrap();
        let sign = match outcome {
            SignInsertOutcome::Created(sign) => sign,
            SignInsertOutcome::Conflict => panic!("unexpected conflict"),
        };
        assert_eq!(sign.word, "Hello");
        assert_eq!(sign.user_id, owner);

        let signs = list_signs(&pool, owner).await.unwrap();
        assert_eq!(signs.len(), 1);
        assert_eq!(signs[0].word, "Hello");

        assert!(delete_sign(&pool, owner, sign.id).await.unwrap());
        assert!(list_signs(&pool, owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_sign_rejected_store_unchanged() {
        let pool = test_pool().await;
        let owner = test_account(&pool, "a@x.com").await;

        let first = insert_sign(&pool, owner, "Hello", "url").await.unwrap();
        assert!(matches!(first, SignInsertOutcome::Created(_)));

        let second = insert_sign(&pool, owner, "Hello", "url").await.unwrap();
        assert!(matches!(second, SignInsertOutcome::Conflict));

        assert_eq!(list_signs(&pool, owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let pool = test_pool().await;
        let owner_a = test_account(&pool, "a@x.com").await;
        let owner_b = test_account(&pool, "b@x.com").await;

        let sign = match insert_sign(&pool, owner_a, "Hi", "url").await.unwrap() {
            SignInsertOutcome::Created(sign) => sign,
            SignInsertOutcome::Conflict => panic!("unexpected conflict"),
        };

        // Another owner cannot delete it, and must not learn it exists
        assert!(!delete_sign(&pool, owner_b, sign.id).await.unwrap());
        assert_eq!(list_signs(&pool, owner_a).await.unwrap().len(), 1);

        // Deleting a sign that never existed looks exactly the same
        assert!(!delete_sign(&pool, owner_b, 9999).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_signs_sorted_by_word() {
        let pool = test_pool().await;
        let owner = test_account(&pool, "a@x.com").await;

        for word in ["zebra", "apple", "mango"] {
            let outcome = insert_sign(&pool, owner, word, "url").await.unwrap();
            assert!(matches!(outcome, SignInsertOutcome::Created(_)));
        }

        let words: Vec<String> = list_signs(&pool, owner)
            .await
            .unwrap()
            .into_iter()
            .map(|sign| sign.word)
            .collect();
        assert_eq!(words, ["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_is_unique_violation_ignores_other_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
