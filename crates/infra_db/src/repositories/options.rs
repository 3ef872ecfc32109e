//! Integration options repository
//!
//! Key-value rows in `integration_options`, one JSONB value per name.

use serde_json::Value;
use sqlx::PgPool;

use crate::error::DatabaseError;

#[derive(Debug, Clone)]
pub struct OptionsRepository {
    pool: PgPool,
}

impl OptionsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Value stored under `name`, if any
    pub async fn find(&self, name: &str) -> Result<Option<Value>, DatabaseError> {
        let value = sqlx::query_scalar::<_, Value>(
            "SELECT value FROM integration_options WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(value)
    }

    /// Inserts or replaces the value under `name`
    pub async fn upsert(&self, name: &str, value: &Value) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO integration_options (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE
                SET value = EXCLUDED.value,
                    updated_at = now()
            "#,
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(())
    }

    /// Inserts the value only when `name` has no row; true when inserted
    pub async fn insert_if_absent(&self, name: &str, value: &Value) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            INSERT INTO integration_options (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(result.rows_affected() == 1)
    }
}
