//! File-record persistence: the per-schema file table holding the original
//! drawing blob. Filenames are unique per schema; re-export under the same
//! name updates in place.

use crate::error::ExportError;
use crate::ident::qualified;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::info;

#[derive(Clone, Debug)]
pub struct FileRecord {
    pub id: i32,
    pub filename: String,
    pub upload_date: Option<NaiveDateTime>,
    pub update_date: Option<NaiveDateTime>,
}

/// Create the file table in the given schema if absent.
pub async fn ensure_file_table(pool: &PgPool, file_schema: &str) -> Result<(), ExportError> {
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  \
           id serial PRIMARY KEY,\n  \
           filename varchar UNIQUE NOT NULL,\n  \
           file_content bytea NOT NULL,\n  \
           upload_date timestamp DEFAULT NOW(),\n  \
           update_date timestamp DEFAULT NOW()\n)",
        qualified(file_schema, "file"),
    );
    sqlx::query(&sql)
        .execute(pool)
        .await
        .map_err(|e| ExportError::Ddl { statement: sql, source: e })?;
    Ok(())
}

/// Insert a new record or update the existing one by filename. Updates
/// refresh the content and update_date only; upload_date keeps the first
/// import time. Returns the row id.
pub async fn upsert_file(
    tx: &mut sqlx::PgConnection,
    file_schema: &str,
    filename: &str,
    content: &[u8],
) -> Result<i32, ExportError> {
    let table = qualified(file_schema, "file");
    let existing: Option<(i32,)> =
        sqlx::query_as(&format!("SELECT id FROM {} WHERE filename = $1", table))
            .bind(filename)
            .fetch_optional(&mut *tx)
            .await?;

    match existing {
        Some((id,)) => {
            sqlx::query(&format!(
                "UPDATE {} SET file_content = $1, update_date = NOW() WHERE id = $2",
                table
            ))
            .bind(content)
            .bind(id)
            .execute(&mut *tx)
            .await?;
            info!(filename, id, "file record updated");
            Ok(id)
        }
        None => {
            let (id,): (i32,) = sqlx::query_as(&format!(
                "INSERT INTO {} (filename, file_content) VALUES ($1, $2) RETURNING id",
                table
            ))
            .bind(filename)
            .bind(content)
            .fetch_one(&mut *tx)
            .await?;
            info!(filename, id, "file record created");
            Ok(id)
        }
    }
}

/// All records in a schema, newest update first, without blobs.
pub async fn list_files(pool: &PgPool, file_schema: &str) -> Result<Vec<FileRecord>, ExportError> {
    let rows: Vec<(i32, String, Option<NaiveDateTime>, Option<NaiveDateTime>)> =
        sqlx::query_as(&format!(
            "SELECT id, filename, upload_date, update_date FROM {} ORDER BY update_date DESC",
            qualified(file_schema, "file")
        ))
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(id, filename, upload_date, update_date)| FileRecord {
            id,
            filename,
            upload_date,
            update_date,
        })
        .collect())
}

/// One record with its blob, by id.
pub async fn fetch_file(
    pool: &PgPool,
    file_schema: &str,
    id: i32,
) -> Result<Option<(FileRecord, Vec<u8>)>, ExportError> {
    let row: Option<(i32, String, Vec<u8>, Option<NaiveDateTime>, Option<NaiveDateTime>)> =
        sqlx::query_as(&format!(
            "SELECT id, filename, file_content, upload_date, update_date FROM {} WHERE id = $1",
            qualified(file_schema, "file")
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(id, filename, content, upload_date, update_date)| {
        (FileRecord { id, filename, upload_date, update_date }, content)
    }))
}

/// Look a record up by filename; the search-resolver-friendly probe.
pub async fn find_file_by_name(
    pool: &PgPool,
    file_schema: &str,
    filename: &str,
) -> Result<Option<FileRecord>, ExportError> {
    let row: Option<(i32, String, Option<NaiveDateTime>, Option<NaiveDateTime>)> =
        sqlx::query_as(&format!(
            "SELECT id, filename, upload_date, update_date FROM {} WHERE filename = $1",
            qualified(file_schema, "file")
        ))
        .bind(filename)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(id, filename, upload_date, update_date)| FileRecord {
        id,
        filename,
        upload_date,
        update_date,
    }))
}

/// Delete a record by id. Layer rows referencing it go with it through the
/// ON DELETE CASCADE foreign keys.
pub async fn delete_file(pool: &PgPool, file_schema: &str, id: i32) -> Result<bool, ExportError> {
    let result = sqlx::query(&format!(
        "DELETE FROM {} WHERE id = $1",
        qualified(file_schema, "file")
    ))
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
