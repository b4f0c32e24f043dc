//! Column-mapping resolution: writes layer rows into a structurally
//! divergent existing table under one of four explicit strategies. All
//! steps of one apply run inside a single transaction; any failure rolls
//! the whole operation back, including backup-table creation.

use crate::convert;
use crate::document::EntityLookup;
use crate::entity::CadEntity;
use crate::error::ExportError;
use crate::ident::{qualified, quoted};
use crate::provision::TableProvisioner;
use crate::sql::{delete_layer_rows, insert_layer_row, PgBind, RowValue};
use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    /// Rename fields only.
    MappingOnly,
    /// Rename and add the listed missing columns.
    MappingAddColumns,
    /// Timestamped backup table before any write.
    MappingBackup,
    /// Both add-columns and backup.
    MappingAddBackup,
}

impl MappingStrategy {
    pub fn adds_columns(self) -> bool {
        matches!(self, MappingStrategy::MappingAddColumns | MappingStrategy::MappingAddBackup)
    }

    pub fn backs_up(self) -> bool {
        matches!(self, MappingStrategy::MappingBackup | MappingStrategy::MappingAddBackup)
    }
}

/// User-supplied reconciliation config, persisted externally as an opaque
/// blob and consumed read-only here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnMappingConfig {
    pub strategy: MappingStrategy,
    /// Canonical field name -> existing column name. Names absent from the
    /// mapping pass through unchanged.
    #[serde(default)]
    pub field_mapping: HashMap<String, String>,
    /// Columns to add under an add-columns strategy.
    #[serde(default)]
    pub new_columns: Vec<String>,
    pub target_table: String,
    pub layer_schema: String,
    pub file_schema: String,
    /// Layer this config applies to; None makes it a global pattern config.
    #[serde(default)]
    pub layer: Option<String>,
}

/// SQL type for a known canonical column name; anything unrecognized gets a
/// generic text column.
pub fn sql_type_for_column(name: &str) -> &'static str {
    match name {
        "file_id" => "integer",
        "geometry" => "geometry(GEOMETRYZ,4326)",
        "geom_type" => "varchar",
        "notes" => "text",
        "extra_data" => "jsonb",
        "color" | "lineweight" | "true_color" | "transparency" => "bigint",
        "linetype" => "varchar",
        "ltscale" => "double precision",
        "invisible" => "boolean",
        _ => "text",
    }
}

pub struct ColumnMappingResolver;

impl ColumnMappingResolver {
    /// Apply one mapping config for one layer's entities. Returns the number
    /// of rows written. Runs reflect -> alter -> backup -> delete -> insert
    /// as one transaction; commit happens exactly once after the last insert.
    pub async fn apply(
        pool: &PgPool,
        config: &ColumnMappingConfig,
        entities: &[CadEntity],
        lookup: &dyn EntityLookup,
        file_id: Option<i32>,
    ) -> Result<u64, ExportError> {
        let table = config.target_table.as_str();
        Self::apply_inner(pool, config, entities, lookup, file_id)
            .await
            .map_err(|e| ExportError::MappingApplication {
                table: table.to_string(),
                message: e.to_string(),
            })
    }

    async fn apply_inner(
        pool: &PgPool,
        config: &ColumnMappingConfig,
        entities: &[CadEntity],
        lookup: &dyn EntityLookup,
        file_id: Option<i32>,
    ) -> Result<u64, ExportError> {
        let schema = config.layer_schema.as_str();
        let table = config.target_table.as_str();
        let mut tx = pool.begin().await?;

        let mut columns =
            TableProvisioner::reflect_columns(&mut *tx, schema, table).await?;
        if columns.is_empty() {
            return Err(ExportError::Config(format!(
                "mapping target '{}.{}' does not exist",
                schema, table
            )));
        }

        if config.strategy.adds_columns() {
            for col in &config.new_columns {
                let sql = format!(
                    "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
                    qualified(schema, table),
                    quoted(col),
                    sql_type_for_column(col),
                );
                sqlx::query(&sql)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| ExportError::Ddl { statement: sql, source: e })?;
            }
            columns = TableProvisioner::reflect_columns(&mut *tx, schema, table).await?;
        }

        if config.strategy.backs_up() {
            let stamp = Local::now().format("%Y%m%d_%H%M%S");
            let backup = format!("{}_backup_{}", table, stamp);
            let sql = format!(
                "CREATE TABLE {} AS SELECT * FROM {}",
                qualified(schema, &backup),
                qualified(schema, table),
            );
            sqlx::query(&sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| ExportError::Ddl { statement: sql, source: e })?;
            info!(table, backup = backup.as_str(), "backup table created");
        }

        // Scope the delete through the same mapped column the inserts use.
        let file_column = mapped(&config.field_mapping, "file_id");
        let del = delete_layer_rows(schema, table, &file_column, file_id);
        let mut del_query = sqlx::query(&del.sql);
        for p in &del.params {
            del_query = del_query.bind(p.clone());
        }
        del_query.execute(&mut *tx).await?;

        let column_set: HashSet<&str> = columns.iter().map(String::as_str).collect();
        let mut written = 0u64;
        for entity in entities {
            let Some(converted) = convert::convert(entity, lookup) else { continue };
            let Some(geometry) = converted.geometry else {
                warn!(
                    handle = entity.common().handle.as_str(),
                    kind = entity.kind_name(),
                    "entity has no geometry; skipped under mapping"
                );
                continue;
            };

            let attributes = converted.attributes.remap(&config.field_mapping);
            let mut values: Vec<RowValue> = Vec::new();
            if let Some(id) = file_id {
                values.push(RowValue::plain(&file_column, PgBind::I64(id as i64)));
            }
            values.push(RowValue::geom(
                &mapped(&config.field_mapping, "geometry"),
                geometry.to_ewkt(),
            ));
            values.push(RowValue::plain(
                &mapped(&config.field_mapping, "geom_type"),
                PgBind::String(converted.geom_type.clone()),
            ));
            values.push(RowValue::plain(
                &mapped(&config.field_mapping, "notes"),
                converted.notes.clone().map(PgBind::String).unwrap_or(PgBind::Null),
            ));
            values.push(RowValue::plain(
                &mapped(&config.field_mapping, "extra_data"),
                PgBind::Json(attributes.to_json()),
            ));
            // Attributes with a dedicated column land there as well; the
            // rest only exist inside extra_data.
            for (name, value) in attributes.iter() {
                if column_set.contains(name) {
                    values.push(RowValue::plain(name, PgBind::from_attr(value)));
                }
            }

            values.retain(|rv| {
                let keep = column_set.contains(rv.column.as_str());
                if !keep {
                    warn!(
                        table,
                        column = rv.column.as_str(),
                        "mapped field has no column; dropped"
                    );
                }
                keep
            });

            let ins = insert_layer_row(schema, table, &values);
            let mut query = sqlx::query(&ins.sql);
            for p in &ins.params {
                query = query.bind(p.clone());
            }
            query.execute(&mut *tx).await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }
}

fn mapped(mapping: &HashMap<String, String>, field: &str) -> String {
    mapping.get(field).cloned().unwrap_or_else(|| field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_flags() {
        assert!(!MappingStrategy::MappingOnly.adds_columns());
        assert!(!MappingStrategy::MappingOnly.backs_up());
        assert!(MappingStrategy::MappingAddColumns.adds_columns());
        assert!(MappingStrategy::MappingBackup.backs_up());
        assert!(MappingStrategy::MappingAddBackup.adds_columns());
        assert!(MappingStrategy::MappingAddBackup.backs_up());
    }

    #[test]
    fn strategy_serde_names() {
        let s: MappingStrategy = serde_json::from_str("\"mapping_add_backup\"").unwrap();
        assert_eq!(s, MappingStrategy::MappingAddBackup);
        assert_eq!(
            serde_json::to_string(&MappingStrategy::MappingOnly).unwrap(),
            "\"mapping_only\""
        );
    }

    #[test]
    fn unknown_column_names_default_to_text() {
        assert_eq!(sql_type_for_column("custom_tag"), "text");
        assert_eq!(sql_type_for_column("geometry"), "geometry(GEOMETRYZ,4326)");
        assert_eq!(sql_type_for_column("extra_data"), "jsonb");
    }

    #[test]
    fn renamed_file_id_scopes_both_delete_and_insert() {
        let mapping: HashMap<String, String> =
            [("file_id".to_string(), "fid".to_string())].into_iter().collect();
        let file_column = mapped(&mapping, "file_id");
        assert_eq!(file_column, "fid");

        let del = delete_layer_rows("gis", "roads", &file_column, Some(9));
        assert_eq!(del.sql, "DELETE FROM \"gis\".\"roads\" WHERE \"fid\" = $1");

        let ins = insert_layer_row(
            "gis",
            "roads",
            &[RowValue::plain(&file_column, PgBind::I64(9))],
        );
        assert!(ins.sql.contains("(\"fid\")"), "{}", ins.sql);
    }

    #[test]
    fn mapped_passes_unmapped_fields_through() {
        let mapping: HashMap<String, String> =
            [("geometry".to_string(), "geom".to_string())].into_iter().collect();
        assert_eq!(mapped(&mapping, "geometry"), "geom");
        assert_eq!(mapped(&mapping, "notes"), "notes");
    }
}
