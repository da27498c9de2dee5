//! `SessionRepository`: transactional sqlx/SQLite access to `bot_sessions`.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::record::BotSessionRecord;

#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Open (creating if absent) the SQLite database at `path` and run the
    /// idempotent schema setup.
    pub async fn open(path: &std::path::Path) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
        let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;
        let repo = Self { pool };
        repo.migrate().await?;
        Ok(repo)
    }

    /// Build a repository around an already-open pool (used by tests with
    /// an in-memory database).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let repo = Self { pool };
        repo.migrate().await?;
        Ok(repo)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bot_sessions (
                user_id     INTEGER PRIMARY KEY,
                session_id  TEXT,
                directory   TEXT NOT NULL,
                model       TEXT,
                betas       TEXT,
                last_active TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bot_sessions_last_active ON bot_sessions(last_active)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id           INTEGER PRIMARY KEY,
                current_directory TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remembers the directory a user last browsed to, independent of
    /// whether they have an active session — read by the Orchestrator at
    /// bootstrap to restore a user's working directory across restarts.
    pub async fn set_current_directory(&self, user_id: i64, directory: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, current_directory) VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET current_directory = excluded.current_directory
            "#,
        )
        .bind(user_id)
        .bind(directory)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_current_directory(&self, user_id: i64) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT current_directory FROM users WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(dir,)| dir))
    }

    /// `INSERT … ON CONFLICT(user_id) DO UPDATE …`; `last_active` is always
    /// set to "now". `session_id`/`model`/`betas` are only overwritten when
    /// `Some`, so a bare directory change doesn't clobber the session.
    pub async fn upsert(
        &self,
        user_id: i64,
        session_id: Option<&str>,
        directory: &str,
        model: Option<&str>,
        betas: Option<&[String]>,
    ) -> Result<()> {
        let betas_json = match betas {
            Some(b) => Some(serde_json::to_string(b)?),
            None => None,
        };
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO bot_sessions (user_id, session_id, directory, model, betas, last_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id) DO UPDATE SET
                session_id = COALESCE(excluded.session_id, bot_sessions.session_id),
                directory = excluded.directory,
                model = COALESCE(excluded.model, bot_sessions.model),
                betas = COALESCE(excluded.betas, bot_sessions.betas),
                last_active = excluded.last_active
            "#,
        )
        .bind(user_id)
        .bind(session_id)
        .bind(directory)
        .bind(model)
        .bind(betas_json)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_user(&self, user_id: i64) -> Result<Option<BotSessionRecord>> {
        let row: Option<(i64, Option<String>, String, Option<String>, Option<String>, String)> = sqlx::query_as(
            "SELECT user_id, session_id, directory, model, betas, last_active FROM bot_sessions WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((user_id, session_id, directory, model, betas, last_active)) = row else {
            return Ok(None);
        };
        let betas = match betas {
            Some(s) => serde_json::from_str(&s)?,
            None => Vec::new(),
        };
        let last_active = chrono::DateTime::parse_from_rfc3339(&last_active)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Some(BotSessionRecord { user_id, session_id, directory, model, betas, last_active }))
    }

    pub async fn delete(&self, user_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM bot_sessions WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete rows whose `last_active` is older than `max_age_hours`;
    /// returns the number of rows removed.
    pub async fn cleanup_expired(&self, max_age_hours: i64) -> Result<u64> {
        let cutoff = (Utc::now() - chrono::Duration::hours(max_age_hours)).to_rfc3339();
        let result = sqlx::query("DELETE FROM bot_sessions WHERE last_active < ?1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_repo() -> SessionRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SessionRepository::from_pool(pool).await.unwrap()
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let repo = memory_repo().await;
        repo.upsert(1, Some("sess-1"), "/home/user/proj", Some("opus"), Some(&["beta-x".to_string()]))
            .await
            .unwrap();
        let record = repo.get_by_user(1).await.unwrap().unwrap();
        assert_eq!(record.session_id.as_deref(), Some("sess-1"));
        assert_eq!(record.directory, "/home/user/proj");
        assert_eq!(record.model.as_deref(), Some("opus"));
        assert_eq!(record.betas, vec!["beta-x".to_string()]);
    }

    #[tokio::test]
    async fn upsert_preserves_session_id_when_not_given() {
        let repo = memory_repo().await;
        repo.upsert(1, Some("sess-1"), "/a", None, None).await.unwrap();
        repo.upsert(1, None, "/b", None, None).await.unwrap();
        let record = repo.get_by_user(1).await.unwrap().unwrap();
        assert_eq!(record.session_id.as_deref(), Some("sess-1"));
        assert_eq!(record.directory, "/b");
    }

    #[tokio::test]
    async fn current_directory_is_remembered_independent_of_session() {
        let repo = memory_repo().await;
        assert!(repo.get_current_directory(1).await.unwrap().is_none());
        repo.set_current_directory(1, "/home/user/proj").await.unwrap();
        assert_eq!(repo.get_current_directory(1).await.unwrap().as_deref(), Some("/home/user/proj"));
        repo.set_current_directory(1, "/home/user/other").await.unwrap();
        assert_eq!(repo.get_current_directory(1).await.unwrap().as_deref(), Some("/home/user/other"));
    }

    #[tokio::test]
    async fn get_by_user_returns_none_for_unknown_user() {
        let repo = memory_repo().await;
        assert!(repo.get_by_user(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let repo = memory_repo().await;
        repo.upsert(1, Some("s"), "/a", None, None).await.unwrap();
        repo.delete(1).await.unwrap();
        assert!(repo.get_by_user(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cleanup_expired_removes_only_stale_rows() {
        let repo = memory_repo().await;
        repo.upsert(1, Some("s"), "/a", None, None).await.unwrap();
        sqlx::query("UPDATE bot_sessions SET last_active = '2000-01-01T00:00:00+00:00' WHERE user_id = 1")
            .execute(&repo.pool)
            .await
            .unwrap();
        repo.upsert(2, Some("s"), "/b", None, None).await.unwrap();

        let removed = repo.cleanup_expired(24).await.unwrap();
        assert_eq!(removed, 1);
        assert!(repo.get_by_user(1).await.unwrap().is_none());
        assert!(repo.get_by_user(2).await.unwrap().is_some());
    }
}
