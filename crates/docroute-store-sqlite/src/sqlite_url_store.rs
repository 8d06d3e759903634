//! SqliteUrlStore - DocumentUrlStore trait implementation for SQLite

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::PathBuf;
use tracing::{debug, info};

use docroute_core::{
    ContentKey, DocumentUrlStore, Error, Result, Route, UrlEntry, UrlEntryKey,
};

/// Current schema version
const SCHEMA_VERSION: u32 = 1;

type EntryRow = (
    String,
    String,
    String,
    bool,
    String,
    Option<String>,
    Option<String>,
);

/// SQLite-backed URL entry store
///
/// One row per `(document_key, culture, segment, is_draft)` tuple, plus a
/// small key/value table.
#[derive(Clone)]
pub struct SqliteUrlStore {
    pool: SqlitePool,
}

impl SqliteUrlStore {
    /// Open (or create) the database at `db_path`
    ///
    /// # Errors
    /// - `Error::Io` if the parent directory can't be created
    /// - `Error::Database` if the connection or schema setup fails
    pub async fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = expand_tilde(db_path.into())?;

        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(&db_path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal),
            )
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Self::initialize_schema(&pool).await?;

        let version: i64 = sqlx::query_scalar("SELECT version FROM schema_version")
            .fetch_one(&pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        if version != i64::from(SCHEMA_VERSION) {
            return Err(Error::Database(format!(
                "Unsupported schema version: {}",
                version
            )));
        }

        info!("Opened URL store at {:?}", db_path);
        Ok(Self { pool })
    }

    async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
            .bind(SCHEMA_VERSION)
            .execute(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS document_urls (
                document_key TEXT NOT NULL,
                culture TEXT NOT NULL,
                segment TEXT NOT NULL,
                is_draft INTEGER NOT NULL,
                url_segment TEXT NOT NULL,
                ancestor_key TEXT,
                route_path TEXT,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (document_key, culture, segment, is_draft)
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    /// Total number of stored entries
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM document_urls")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn entry_from_row(row: EntryRow) -> Result<UrlEntry> {
    let (document_key, culture, segment, is_draft, url_segment, ancestor_key, route_path) = row;

    let route = match route_path {
        Some(path) => {
            let ancestor_key = ancestor_key
                .as_deref()
                .map(ContentKey::from_string)
                .transpose()
                .map_err(|e| Error::Database(format!("Corrupt ancestor key: {}", e)))?;
            Some(Route::new(ancestor_key, path))
        }
        None => None,
    };

    let document_key = ContentKey::from_string(&document_key)
        .map_err(|e| Error::Database(format!("Corrupt document key: {}", e)))?;

    Ok(UrlEntry {
        key: UrlEntryKey {
            document_key,
            culture,
            segment,
            is_draft,
        },
        url_segment,
        route,
    })
}

/// Replace a leading `~` with the home directory
fn expand_tilde(path: PathBuf) -> Result<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path);
    };
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Internal("Could not determine home directory".to_string()))?;
    Ok(home.join(rest))
}

#[async_trait]
impl DocumentUrlStore for SqliteUrlStore {
    async fn get(&self, key: &UrlEntryKey) -> Result<Option<UrlEntry>> {
        let row: Option<EntryRow> = sqlx::query_as(
            r#"
            SELECT document_key, culture, segment, is_draft, url_segment, ancestor_key, route_path
            FROM document_urls
            WHERE document_key = ? AND culture = ? AND segment = ? AND is_draft = ?
            "#,
        )
        .bind(key.document_key.to_string())
        .bind(&key.culture)
        .bind(&key.segment)
        .bind(key.is_draft)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        row.map(entry_from_row).transpose()
    }

    async fn save(&self, entries: Vec<UrlEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        for entry in &entries {
            let ancestor_key = entry
                .route
                .as_ref()
                .and_then(|r| r.ancestor_key)
                .map(|k| k.to_string());
            let route_path = entry.route.as_ref().map(|r| r.path.as_str());

            sqlx::query(
                r#"
                INSERT INTO document_urls
                    (document_key, culture, segment, is_draft, url_segment, ancestor_key, route_path)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(document_key, culture, segment, is_draft) DO UPDATE SET
                    url_segment = excluded.url_segment,
                    ancestor_key = excluded.ancestor_key,
                    route_path = excluded.route_path,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                "#,
            )
            .bind(entry.key.document_key.to_string())
            .bind(&entry.key.culture)
            .bind(&entry.key.segment)
            .bind(entry.key.is_draft)
            .bind(&entry.url_segment)
            .bind(ancestor_key)
            .bind(route_path)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        debug!("Saved {} URL entries", entries.len());
        Ok(())
    }

    async fn delete(&self, key: &UrlEntryKey) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM document_urls
            WHERE document_key = ? AND culture = ? AND segment = ? AND is_draft = ?
            "#,
        )
        .bind(key.document_key.to_string())
        .bind(&key.culture)
        .bind(&key.segment)
        .bind(key.is_draft)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_document(&self, document_key: ContentKey) -> Result<u64> {
        let result = sqlx::query("DELETE FROM document_urls WHERE document_key = ?")
            .bind(document_key.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn entries_for(&self, document_key: ContentKey) -> Result<Vec<UrlEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT document_key, culture, segment, is_draft, url_segment, ancestor_key, route_path
            FROM document_urls
            WHERE document_key = ?
            ORDER BY culture, segment, is_draft
            "#,
        )
        .bind(document_key.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(entry_from_row).collect()
    }

    async fn get_value(&self, name: &str) -> Result<Option<String>> {
        sqlx::query_scalar("SELECT value FROM key_value WHERE key = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn set_value(&self, name: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO key_value (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    fn schema_version(&self) -> u32 {
        SCHEMA_VERSION
    }
}

impl std::fmt::Debug for SqliteUrlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteUrlStore").finish_non_exhaustive()
    }
}
