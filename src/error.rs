//! Typed errors for the export pipeline.
//!
//! Entity- and layer-scoped variants are recovered close to where they
//! occur (logged, entity or layer skipped); connection- and
//! extension-scoped variants abort the whole export.

use thiserror::Error;

/// Per-entity conversion failure. Always recoverable: the converter logs it
/// and yields no row for the offending entity.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unsupported entity kind '{kind}' (handle {handle})")]
    UnsupportedKind { kind: String, handle: String },
    #[error("entity {handle}: {message}")]
    Invalid { handle: String, message: String },
    #[error("entity {handle}: referenced handle '{reference}' not found")]
    DanglingReference { handle: String, reference: String },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("connection failed: {0}")]
    Connection(sqlx::Error),
    #[error("spatial extension is not available on the server: {0}")]
    ExtensionUnavailable(String),
    #[error("spatial extension exists but the connected role may not install it: {0}")]
    ExtensionPermissionDenied(String),
    #[error("table '{table}' diverges from the canonical structure: {reason}")]
    StructuralDrift { table: String, reason: String },
    #[error("column mapping failed for table '{table}': {message}")]
    MappingApplication { table: String, message: String },
    #[error("DDL failed for '{statement}': {source}")]
    Ddl {
        statement: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl ExportError {
    /// True for errors that abort the whole export rather than one entity
    /// or layer.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExportError::Connection(_)
                | ExportError::ExtensionUnavailable(_)
                | ExportError::ExtensionPermissionDenied(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connection_and_extension_errors_are_fatal() {
        assert!(ExportError::ExtensionUnavailable("x".into()).is_fatal());
        assert!(ExportError::ExtensionPermissionDenied("x".into()).is_fatal());
        assert!(!ExportError::Config("x".into()).is_fatal());
        assert!(!ExportError::StructuralDrift { table: "t".into(), reason: "r".into() }
            .is_fatal());
        assert!(!ExportError::MappingApplication { table: "t".into(), message: "m".into() }
            .is_fatal());
    }
}
