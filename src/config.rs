//! Connection and schema configuration, plus the external settings-store
//! seam. Mapping-config blobs are persisted by the surrounding application
//! as opaque strings; this module parses them leniently on the way in.

use crate::error::ExportError;
use crate::mapping::ColumnMappingConfig;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

fn default_port() -> u16 {
    5432
}

impl ConnectionConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Target schemas for an export. Layer tables and the file table may live in
/// different schemas.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default = "default_layer_schema")]
    pub layer_schema: String,
    #[serde(default = "default_file_schema")]
    pub file_schema: String,
}

fn default_layer_schema() -> String {
    "public".into()
}

fn default_file_schema() -> String {
    "file_schema".into()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig {
            layer_schema: default_layer_schema(),
            file_schema: default_file_schema(),
        }
    }
}

/// External key-value settings store: last-used connection, chosen schemas,
/// column-mapping blobs. The core never interprets keys it does not own.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String);
}

/// Parse persisted column-mapping configs. Unknown fields in the blob are
/// ignored so older or richer settings remain loadable.
pub fn parse_mapping_configs(blob: &str) -> Result<Vec<ColumnMappingConfig>, ExportError> {
    serde_json::from_str(blob)
        .map_err(|e| ExportError::Config(format!("column mapping blob: {}", e)))
}
