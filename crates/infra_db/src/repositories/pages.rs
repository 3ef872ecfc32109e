//! Page repository
//!
//! Read access to the `pages` table mirrored from the host content store.

use sqlx::PgPool;

use crate::error::DatabaseError;

/// Status value of a published page
pub const PUBLISHED: &str = "publish";

/// Row type for a page
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PageRow {
    pub page_id: i64,
    pub title: String,
    pub status: String,
    pub layout: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PageRepository {
    pool: PgPool,
}

impl PageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Published pages in menu order, then id
    pub async fn find_published(&self) -> Result<Vec<PageRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PageRow>(
            r#"
            SELECT page_id, title, status, layout
            FROM pages
            WHERE status = $1
            ORDER BY menu_order, page_id
            "#,
        )
        .bind(PUBLISHED)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(rows)
    }

    /// Inserts or replaces a page; used when syncing from the host
    pub async fn upsert(
        &self,
        page_id: i64,
        title: &str,
        status: &str,
        layout: Option<&str>,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO pages (page_id, title, status, layout)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (page_id) DO UPDATE
                SET title = EXCLUDED.title,
                    status = EXCLUDED.status,
                    layout = EXCLUDED.layout,
                    updated_at = now()
            "#,
        )
        .bind(page_id)
        .bind(title)
        .bind(status)
        .bind(layout)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(())
    }
}
