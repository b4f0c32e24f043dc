//! cadexport: CAD drawing export into a PostGIS-backed relational store.
//!
//! Drawing primitives convert to geometries plus attribute bags and land in
//! one dynamically provisioned table per layer; existing tables that have
//! drifted from the canonical structure are reconciled under explicit
//! column-mapping strategies.

pub mod attr;
pub mod config;
pub mod convert;
pub mod document;
pub mod entity;
pub mod error;
pub mod export;
pub mod files;
pub mod geometry;
pub mod ident;
pub mod mapping;
pub mod policy;
pub mod provision;
pub mod schema;
pub mod search;
pub mod sql;

pub use attr::{AttrValue, AttributeBag};
pub use config::{parse_mapping_configs, ConnectionConfig, SchemaConfig, SettingsStore};
pub use convert::{convert, Converted};
pub use document::{DocumentReader, EntityLookup, Layer, MemoryDocument};
pub use entity::{CadEntity, CommonAttributes, Point3};
pub use error::{ConvertError, ExportError};
pub use export::{ExportOutcome, ExportRequest, Exporter, MODE_ALWAYS_OVERWRITE};
pub use files::FileRecord;
pub use geometry::{Geometry, SRID};
pub use mapping::{ColumnMappingConfig, ColumnMappingResolver, MappingStrategy};
pub use policy::{DecisionPolicy, NoInteraction, PreviewRenderer, ProgressSink};
pub use provision::{DriftReport, TableProvisioner, CANONICAL_COLUMNS};
pub use schema::SchemaCatalog;
pub use search::{find_in_schemas, SchemaDirectory, DEFAULT_SCHEMAS};
