// Entity Traits - row mapping, projection and the generic read/delete operations
// Writes are entity-specific and live on the `New*` payloads.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{sqlite::SqliteRow, FromRow};

use crate::codegen::quote_ident;
use crate::database::SocialDatabase;
use crate::error::{AppError, AppResult};
use crate::models::EntityType;

/// Flat field-name to value mapping returned by `serialize()`
pub type Projection = Map<String, Value>;

/// Implemented by every persisted record type
#[async_trait]
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Clone + Send + Sync + Unpin + Sized {
    /// Column list used when loading rows of this entity
    const COLUMNS: &'static str;

    /// Ordering applied to multi-row loads
    const ORDER_BY: &'static str = "\"id\"";

    fn entity_type() -> EntityType;

    /// Project the record's own scalar columns. Never follows relationships.
    fn serialize(&self) -> Projection;

    /// All rows whose `column` equals `value`
    async fn gen_where(db: &SocialDatabase, column: &str, value: i64) -> AppResult<Vec<Self>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ? ORDER BY {}",
            Self::COLUMNS,
            quote_ident(Self::entity_type().table_name()),
            quote_ident(column),
            Self::ORDER_BY
        );
        let rows = sqlx::query_as::<_, Self>(&sql)
            .bind(value)
            .fetch_all(db.pool())
            .await?;
        Ok(rows)
    }

    async fn gen_all(db: &SocialDatabase) -> AppResult<Vec<Self>> {
        let sql = format!(
            "SELECT {} FROM \"{}\" ORDER BY {}",
            Self::COLUMNS,
            Self::entity_type().table_name(),
            Self::ORDER_BY
        );
        let rows = sqlx::query_as::<_, Self>(&sql).fetch_all(db.pool()).await?;
        Ok(rows)
    }
}

/// Entities identified by a single store-assigned integer `id` column
#[async_trait]
pub trait KeyedEntity: Entity {
    /// Load by id, `None` when no such row exists
    async fn gen_nullable(db: &SocialDatabase, id: i64) -> AppResult<Option<Self>> {
        let sql = format!(
            "SELECT {} FROM \"{}\" WHERE \"id\" = ?",
            Self::COLUMNS,
            Self::entity_type().table_name()
        );
        let row = sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(db.pool())
            .await?;
        Ok(row)
    }

    /// Load by id, failing with `NotFound` when no such row exists
    async fn gen_enforce(db: &SocialDatabase, id: i64) -> AppResult<Self> {
        Self::gen_nullable(db, id).await?.ok_or_else(|| {
            AppError::NotFound(format!("{} with id {} not found", Self::entity_type(), id))
        })
    }

    async fn exists(db: &SocialDatabase, id: i64) -> AppResult<bool> {
        let sql = format!(
            "SELECT 1 FROM \"{}\" WHERE \"id\" = ?",
            Self::entity_type().table_name()
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(db.pool()).await?;
        Ok(row.is_some())
    }

    /// Delete by id. Dependent rows are not cascaded, so a referenced row
    /// fails with a foreign-key violation.
    async fn delete(db: &SocialDatabase, id: i64) -> AppResult<bool> {
        let sql = format!(
            "DELETE FROM \"{}\" WHERE \"id\" = ?",
            Self::entity_type().table_name()
        );
        let result = sqlx::query(&sql).bind(id).execute(db.pool()).await?;
        if result.rows_affected() > 0 {
            tracing::debug!(table = %Self::entity_type(), id, "deleted row");
        }
        Ok(result.rows_affected() > 0)
    }
}
