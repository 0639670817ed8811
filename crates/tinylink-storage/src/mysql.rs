use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};
use tinylink_core::repository::Result;
use tinylink_core::{CreateOutcome, ReadRepository, Repository, ShortCode, StorageError, UrlRecord};
use tracing::{debug, trace};

/// Schema for the `short_urls` table.
pub const SCHEMA: &str = include_str!("../ddl/mysql/short_urls.sql");

/// MySQL implementation of the repository contract.
///
/// `short_code` is the primary key, compared byte-wise so codes stay
/// case-sensitive. Creation is a plain `INSERT`; the primary key turns a
/// concurrent second insert of the same code into a unique violation, which
/// is answered by reading back the row that won.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `short_urls` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn fetch(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT original_url, created_at
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
        let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

        Ok(Some(UrlRecord {
            original_url,
            created_at: parse_created_at(created_at_raw)?,
        }))
    }
}

fn parse_created_at(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", millis))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "Reading mapping from MySQL");
        self.fetch(code).await
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn create_if_absent(
        &self,
        code: &ShortCode,
        record: UrlRecord,
    ) -> Result<CreateOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_code, original_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(code.as_str())
        .bind(record.original_url.as_str())
        .bind(record.created_at.as_millisecond())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(err) if is_unique_violation(&err) => {
                debug!(code = %code, "Short code already taken in MySQL");
                // Rows are never deleted, so the winning row is still there.
                let existing = self.fetch(code).await?.ok_or_else(|| {
                    StorageError::InvalidData(format!(
                        "short code '{code}' conflicted but no row was found"
                    ))
                })?;
                Ok(CreateOutcome::AlreadyExists(existing))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_round_trips_through_millis() {
        let now = Timestamp::now();
        let millis = now.as_millisecond();
        let parsed = parse_created_at(millis).unwrap();
        assert_eq!(parsed.as_millisecond(), millis);
    }

    #[test]
    fn out_of_range_created_at_is_invalid_data() {
        let err = parse_created_at(i64::MAX).unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }

    #[test]
    fn pool_errors_map_to_backend_kinds() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StorageError::Timeout(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StorageError::InvalidData(_)
        ));
    }

    #[test]
    fn schema_keys_on_case_sensitive_code() {
        assert!(SCHEMA.contains("PRIMARY KEY (short_code)"));
        assert!(SCHEMA.contains("ascii_bin"));
    }

    #[test]
    fn schema_stores_urls_longer_than_a_text_column() {
        assert!(SCHEMA.contains("original_url LONGTEXT NOT NULL"));
    }
}
