//! Export coordination: connect, verify the spatial extension, persist the
//! file blob, then drive provisioning/mapping/conversion layer by layer.
//!
//! Layers are strictly sequential on one pool. The file record commits
//! before the layer loop so mapped layers (which run their own transaction)
//! can reference it; each layer then fully commits or fully rolls back, so
//! cancellation after layer N leaves layers 1..N in place and aborts N+1.

use crate::config::{ConnectionConfig, SchemaConfig};
use crate::convert;
use crate::document::DocumentReader;
use crate::error::ExportError;
use crate::files;
use crate::mapping::{ColumnMappingConfig, ColumnMappingResolver};
use crate::policy::{NullProgress, NullRenderer, PreviewRenderer, ProgressSink};
use crate::provision::TableProvisioner;
use crate::schema::SchemaCatalog;
use crate::sql::{delete_layer_rows, insert_layer_row, PgBind, RowValue};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The only bulk strategy defined today. The field exists so future
/// geometry/notes-based merge strategies can land without changing the
/// export contract.
pub const MODE_ALWAYS_OVERWRITE: &str = "always_overwrite";

/// One export request. The drawing itself arrives through the
/// `DocumentReader` collaborator.
#[derive(Clone, Debug)]
pub struct ExportRequest {
    pub connection: ConnectionConfig,
    pub schemas: SchemaConfig,
    /// Bulk strategy; must be [`MODE_ALWAYS_OVERWRITE`].
    pub mapping_mode: String,
    /// Skip the file blob entirely and write layer rows with no file scope.
    pub export_layers_only: bool,
    /// Original drawing bytes, stored when not layers-only.
    pub file_content: Option<Vec<u8>>,
    /// Filename for the file record: the drawing's own name or a
    /// caller-supplied custom one.
    pub filename: String,
    pub mapping_configs: Vec<ColumnMappingConfig>,
}

#[derive(Clone, Debug, Default)]
pub struct ExportOutcome {
    pub file_id: Option<i32>,
    pub layers_written: Vec<String>,
    pub layers_skipped: Vec<String>,
    pub rows_written: u64,
    /// True when a cooperative cancel stopped the loop between layers.
    pub cancelled: bool,
}

pub struct Exporter {
    progress: Arc<dyn ProgressSink>,
    renderer: Arc<dyn PreviewRenderer>,
    cancel: Arc<AtomicBool>,
}

impl Default for Exporter {
    fn default() -> Self {
        Exporter::new(Arc::new(NullProgress), Arc::new(NullRenderer))
    }
}

impl Exporter {
    pub fn new(progress: Arc<dyn ProgressSink>, renderer: Arc<dyn PreviewRenderer>) -> Self {
        Exporter { progress, renderer, cancel: Arc::new(AtomicBool::new(false)) }
    }

    /// Flag checked between layers; flip it to stop the export after the
    /// in-flight layer finishes.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Run one export end to end. Per-layer failures are logged and
    /// recorded in the outcome; only connection loss, extension
    /// unavailability, or an uncaught error fails the whole call.
    pub async fn export(
        &self,
        document: &dyn DocumentReader,
        request: &ExportRequest,
    ) -> Result<ExportOutcome, ExportError> {
        validate_mapping_mode(&request.mapping_mode)?;

        self.progress.report(0, "connecting").await;
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(request.connection.connect_options())
            .await
            .map_err(ExportError::Connection)?;

        self.progress.report(5, "checking spatial extension").await;
        ensure_spatial_extension(&pool).await?;

        let layer_schema = request.schemas.layer_schema.as_str();
        let file_schema = request.schemas.file_schema.as_str();
        SchemaCatalog::create_schema(&pool, layer_schema).await?;
        SchemaCatalog::create_schema(&pool, file_schema).await?;
        files::ensure_file_table(&pool, file_schema).await?;

        let mut outcome = ExportOutcome::default();

        if !request.export_layers_only {
            if let Some(content) = &request.file_content {
                self.progress.report(10, "storing drawing file").await;
                let mut tx = pool.begin().await?;
                let id =
                    files::upsert_file(&mut tx, file_schema, &request.filename, content).await?;
                tx.commit().await?;
                outcome.file_id = Some(id);
            }
        }

        let layers = document.layers();
        let total = layers.len().max(1);
        for (i, layer) in layers.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                warn!(layer = layer.name.as_str(), "export cancelled before layer");
                outcome.cancelled = true;
                break;
            }
            let percent = 10 + (i * 85 / total) as u8;
            self.progress
                .report(percent, &format!("exporting layer '{}'", layer.name))
                .await;

            match self
                .export_layer(&pool, document, request, layer, outcome.file_id)
                .await
            {
                Ok(0) => {
                    info!(layer = layer.name.as_str(), "layer produced no rows; skipped");
                    outcome.layers_skipped.push(layer.name.clone());
                }
                Ok(rows) => {
                    outcome.rows_written += rows;
                    outcome.layers_written.push(layer.name.clone());
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!(layer = layer.name.as_str(), error = %e, "layer skipped");
                    outcome.layers_skipped.push(layer.name.clone());
                }
            }
        }

        self.progress.report(100, "export finished").await;

        if let Some(file_id) = outcome.file_id {
            if !outcome.cancelled {
                self.renderer.render(file_id, &request.filename).await;
            }
        }
        Ok(outcome)
    }

    /// One layer: drift check, then either the mapping path or the
    /// canonical delete+reinsert path. Returns rows written.
    async fn export_layer(
        &self,
        pool: &PgPool,
        document: &dyn DocumentReader,
        request: &ExportRequest,
        layer: &crate::document::Layer,
        file_id: Option<i32>,
    ) -> Result<u64, ExportError> {
        let layer_schema = request.schemas.layer_schema.as_str();
        let file_schema = request.schemas.file_schema.as_str();

        let drift =
            TableProvisioner::needs_column_mapping(pool, &layer.name, layer_schema).await?;

        if drift.needs_mapping {
            match select_mapping_config(&request.mapping_configs, &layer.name) {
                Some(config) => {
                    match ColumnMappingResolver::apply(
                        pool,
                        config,
                        &layer.entities,
                        document,
                        file_id,
                    )
                    .await
                    {
                        Ok(rows) => return Ok(rows),
                        Err(e) => {
                            warn!(
                                layer = layer.name.as_str(),
                                error = %e,
                                "mapping failed; falling back to canonical path"
                            );
                        }
                    }
                }
                None => {
                    return Err(ExportError::StructuralDrift {
                        table: layer.name.clone(),
                        reason: drift.reason,
                    });
                }
            }
        }

        // Canonical path. Convert first: a layer that yields no rows must
        // not create a table.
        let mut rows: Vec<Vec<RowValue>> = Vec::new();
        for entity in &layer.entities {
            let Some(converted) = convert::convert(entity, document) else { continue };
            let Some(geometry) = converted.geometry else {
                warn!(
                    handle = entity.common().handle.as_str(),
                    kind = entity.kind_name(),
                    "entity has no geometry; skipped on canonical path"
                );
                continue;
            };
            let mut values = Vec::with_capacity(5);
            if let Some(id) = file_id {
                values.push(RowValue::plain("file_id", PgBind::I64(id as i64)));
            }
            values.push(RowValue::geom("geometry", geometry.to_ewkt()));
            values.push(RowValue::plain("geom_type", PgBind::String(converted.geom_type)));
            values.push(RowValue::plain(
                "notes",
                converted.notes.map(PgBind::String).unwrap_or(PgBind::Null),
            ));
            values.push(RowValue::plain(
                "extra_data",
                PgBind::Json(converted.attributes.to_json()),
            ));
            rows.push(values);
        }
        if rows.is_empty() {
            return Ok(0);
        }

        let table =
            TableProvisioner::ensure_layer_table(pool, &layer.name, layer_schema, file_schema)
                .await?;

        let mut tx = pool.begin().await?;
        let del = delete_layer_rows(layer_schema, &table, "file_id", file_id);
        let mut del_query = sqlx::query(&del.sql);
        for p in &del.params {
            del_query = del_query.bind(p.clone());
        }
        del_query.execute(&mut *tx).await?;

        let written = rows.len() as u64;
        for values in rows {
            let ins = insert_layer_row(layer_schema, &table, &values);
            let mut query = sqlx::query(&ins.sql);
            for p in &ins.params {
                query = query.bind(p.clone());
            }
            query.execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(written)
    }
}

/// Only `always_overwrite` exists today; anything else is a config error so
/// the mode field can grow merge strategies later without silent fallbacks.
pub fn validate_mapping_mode(mode: &str) -> Result<(), ExportError> {
    if mode == MODE_ALWAYS_OVERWRITE {
        Ok(())
    } else {
        Err(ExportError::Config(format!("unknown mapping mode '{mode}'")))
    }
}

/// A layer-specific config beats a global pattern config.
pub fn select_mapping_config<'a>(
    configs: &'a [ColumnMappingConfig],
    layer_name: &str,
) -> Option<&'a ColumnMappingConfig> {
    configs
        .iter()
        .find(|c| c.layer.as_deref() == Some(layer_name))
        .or_else(|| configs.iter().find(|c| c.layer.is_none()))
}

/// PostGIS must be installed, or installable by the connected role.
/// Distinguishes "not on the server" from "install privilege denied".
async fn ensure_spatial_extension(pool: &PgPool) -> Result<(), ExportError> {
    let installed: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_extension WHERE extname = 'postgis')")
            .fetch_one(pool)
            .await?;
    if installed.0 {
        return Ok(());
    }

    let available: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM pg_available_extensions WHERE name = 'postgis')",
    )
    .fetch_one(pool)
    .await?;
    if !available.0 {
        return Err(ExportError::ExtensionUnavailable(
            "postgis is not among the server's available extensions".into(),
        ));
    }

    match sqlx::query("CREATE EXTENSION IF NOT EXISTS postgis").execute(pool).await {
        Ok(_) => Ok(()),
        Err(e) => {
            let permission = e
                .as_database_error()
                .and_then(|d| d.code())
                .map(|c| c == "42501")
                .unwrap_or(false);
            if permission {
                Err(ExportError::ExtensionPermissionDenied(e.to_string()))
            } else {
                Err(ExportError::ExtensionUnavailable(e.to_string()))
            }
        }
    }
}
