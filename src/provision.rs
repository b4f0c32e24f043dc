//! Table provisioning: canonical per-layer tables, created lazily, never
//! altered implicitly. Drift against an existing table is detected here and
//! resolved elsewhere (mapping module) or not at all.

use crate::error::ExportError;
use crate::ident::{layer_table_ident, qualified};
use crate::sql::reflect_columns_sql;
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::info;

/// Canonical layer-table columns, in DDL order.
pub const CANONICAL_COLUMNS: [&str; 6] =
    ["id", "file_id", "geometry", "geom_type", "notes", "extra_data"];

/// Outcome of comparing a live table against the canonical structure.
#[derive(Clone, Debug)]
pub struct DriftReport {
    pub needs_mapping: bool,
    pub existing_columns: Vec<String>,
    pub reason: String,
}

pub struct TableProvisioner;

impl TableProvisioner {
    /// Create the canonical 6-column table for a layer if it does not exist;
    /// an existing table is returned untouched regardless of its structure.
    /// Returns the normalized table identifier.
    pub async fn ensure_layer_table(
        pool: &PgPool,
        layer_name: &str,
        layer_schema: &str,
        file_schema: &str,
    ) -> Result<String, ExportError> {
        let table = layer_table_ident(layer_name);
        if table.is_empty() {
            return Err(ExportError::Config(format!(
                "layer name '{layer_name}' normalizes to an empty identifier"
            )));
        }
        if Self::table_exists(pool, layer_schema, &table).await? {
            return Ok(table);
        }
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  \
               id serial PRIMARY KEY,\n  \
               file_id integer NULL REFERENCES {} (id) ON DELETE CASCADE,\n  \
               geometry geometry(GEOMETRYZ,4326) NOT NULL,\n  \
               geom_type varchar NOT NULL,\n  \
               notes text NULL,\n  \
               extra_data jsonb NULL\n)",
            qualified(layer_schema, &table),
            qualified(file_schema, "file"),
        );
        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| ExportError::Ddl { statement: sql, source: e })?;
        info!(schema = layer_schema, table = table.as_str(), "layer table created");
        Ok(table)
    }

    pub async fn table_exists(
        pool: &PgPool,
        schema: &str,
        table: &str,
    ) -> Result<bool, ExportError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM information_schema.tables \
             WHERE table_schema = $1 AND table_name = $2)",
        )
        .bind(schema)
        .bind(table)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Live column names in ordinal order. Works inside or outside a
    /// transaction.
    pub async fn reflect_columns<'e, E>(
        exec: E,
        schema: &str,
        table: &str,
    ) -> Result<Vec<String>, ExportError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows: Vec<(String,)> = sqlx::query_as(reflect_columns_sql())
            .bind(schema)
            .bind(table)
            .fetch_all(exec)
            .await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Compare a layer's existing table against the canonical structure.
    /// A table that does not exist yet needs no mapping; it will be created
    /// fresh on the default path.
    pub async fn needs_column_mapping(
        pool: &PgPool,
        layer_name: &str,
        layer_schema: &str,
    ) -> Result<DriftReport, ExportError> {
        let table = layer_table_ident(layer_name);
        if !Self::table_exists(pool, layer_schema, &table).await? {
            return Ok(DriftReport {
                needs_mapping: false,
                existing_columns: Vec::new(),
                reason: format!("table '{table}' does not exist; will be created fresh"),
            });
        }
        let existing = Self::reflect_columns(pool, layer_schema, &table).await?;
        Ok(compare_columns(&table, &existing))
    }
}

/// Pure drift comparison: missing canonical columns and unexpected extras
/// each contribute one finding to the reason text.
pub fn compare_columns(table: &str, existing: &[String]) -> DriftReport {
    let existing_set: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let canonical_set: HashSet<&str> = CANONICAL_COLUMNS.into_iter().collect();

    let mut findings = Vec::new();
    for col in CANONICAL_COLUMNS {
        if !existing_set.contains(col) {
            findings.push(format!("missing canonical column '{col}'"));
        }
    }
    for col in existing {
        if !canonical_set.contains(col.as_str()) {
            findings.push(format!("unexpected column '{col}'"));
        }
    }

    if findings.is_empty() {
        DriftReport {
            needs_mapping: false,
            existing_columns: existing.to_vec(),
            reason: format!("table '{table}' matches the canonical structure"),
        }
    } else {
        DriftReport {
            needs_mapping: true,
            existing_columns: existing.to_vec(),
            reason: format!("table '{table}': {}", findings.join("; ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn canonical_table_reports_no_drift() {
        let report = compare_columns("roads", &cols(&CANONICAL_COLUMNS));
        assert!(!report.needs_mapping);
    }

    #[test]
    fn missing_and_extra_columns_both_cited() {
        let existing = cols(&["id", "file_id", "geometry", "geom_type", "notes", "custom_field"]);
        let report = compare_columns("roads", &existing);
        assert!(report.needs_mapping);
        assert!(report.reason.contains("missing canonical column 'extra_data'"), "{}", report.reason);
        assert!(report.reason.contains("unexpected column 'custom_field'"), "{}", report.reason);
    }

    #[test]
    fn column_order_does_not_matter() {
        let shuffled = cols(&["extra_data", "geometry", "id", "notes", "geom_type", "file_id"]);
        assert!(!compare_columns("roads", &shuffled).needs_mapping);
    }
}
