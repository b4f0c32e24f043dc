//! Schema catalog: thin DDL/catalog wrapper over database schemas.

use crate::error::ExportError;
use crate::ident::quoted;
use sqlx::PgPool;

pub struct SchemaCatalog;

impl SchemaCatalog {
    /// User schemas, excluding the Postgres-internal ones.
    pub async fn list_schemas(pool: &PgPool) -> Result<Vec<String>, ExportError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT schema_name FROM information_schema.schemata \
             WHERE schema_name NOT LIKE 'pg_%' AND schema_name <> 'information_schema' \
             ORDER BY schema_name",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    pub async fn schema_exists(pool: &PgPool, name: &str) -> Result<bool, ExportError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    pub async fn create_schema(pool: &PgPool, name: &str) -> Result<(), ExportError> {
        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(name));
        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| ExportError::Ddl { statement: sql, source: e })?;
        Ok(())
    }
}
