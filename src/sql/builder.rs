//! Builds parameterized INSERT/DELETE/reflection statements for layer
//! tables. Identifiers come from validated/normalized names and are always
//! quoted; values always bind through placeholders.

use crate::ident::{qualified, quoted};
use crate::sql::PgBind;

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBind>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf { sql: String::new(), params: Vec::new() }
    }

    fn push_param(&mut self, v: PgBind) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// One column of a layer row about to be inserted. `geometry` marks the
/// value as EWKT text whose placeholder must be wrapped in ST_GeomFromEWKT.
#[derive(Clone, Debug)]
pub struct RowValue {
    pub column: String,
    pub value: PgBind,
    pub geometry: bool,
}

impl RowValue {
    pub fn plain(column: &str, value: PgBind) -> Self {
        RowValue { column: column.to_string(), value, geometry: false }
    }

    pub fn geom(column: &str, ewkt: String) -> Self {
        RowValue { column: column.to_string(), value: PgBind::String(ewkt), geometry: true }
    }
}

/// INSERT one row into a layer table from an explicit column/value list.
pub fn insert_layer_row(schema: &str, table: &str, values: &[RowValue]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for rv in values {
        let n = q.push_param(rv.value.clone());
        cols.push(quoted(&rv.column));
        if rv.geometry {
            placeholders.push(format!("ST_GeomFromEWKT(${})", n));
        } else if matches!(rv.value, PgBind::Json(_)) {
            placeholders.push(format!("${}::jsonb", n));
        } else {
            placeholders.push(format!("${}", n));
        }
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified(schema, table),
        cols.join(", "),
        placeholders.join(", ")
    );
    q
}

/// DELETE prior rows: scoped to one file when `file_id` is present, all rows
/// in the layers-only case. `file_column` is the live name of the file-scope
/// column ("file_id" canonically, possibly remapped on drifted tables).
pub fn delete_layer_rows(
    schema: &str,
    table: &str,
    file_column: &str,
    file_id: Option<i32>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    match file_id {
        Some(id) => {
            let n = q.push_param(PgBind::I64(id as i64));
            q.sql = format!(
                "DELETE FROM {} WHERE {} = ${}",
                qualified(schema, table),
                quoted(file_column),
                n
            );
        }
        None => {
            q.sql = format!("DELETE FROM {}", qualified(schema, table));
        }
    }
    q
}

/// Column names of a live table, in ordinal order. Binds schema then table.
pub fn reflect_columns_sql() -> &'static str {
    "SELECT column_name FROM information_schema.columns \
     WHERE table_schema = $1 AND table_name = $2 ORDER BY ordinal_position"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_wraps_geometry_placeholder() {
        let q = insert_layer_row(
            "gis",
            "roads",
            &[
                RowValue::plain("file_id", PgBind::I64(7)),
                RowValue::geom("geometry", "SRID=4326;POINT Z (0 0 0)".into()),
                RowValue::plain("geom_type", PgBind::String("POINT".into())),
                RowValue::plain("extra_data", PgBind::Json(serde_json::json!({"color": 7}))),
            ],
        );
        assert_eq!(
            q.sql,
            "INSERT INTO \"gis\".\"roads\" (\"file_id\", \"geometry\", \"geom_type\", \"extra_data\") \
             VALUES ($1, ST_GeomFromEWKT($2), $3, $4::jsonb)"
        );
        assert_eq!(q.params.len(), 4);
    }

    #[test]
    fn delete_scopes_to_file_id_when_present() {
        let q = delete_layer_rows("gis", "roads", "file_id", Some(3));
        assert_eq!(q.sql, "DELETE FROM \"gis\".\"roads\" WHERE \"file_id\" = $1");
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn delete_scopes_through_a_renamed_file_column() {
        let q = delete_layer_rows("gis", "roads", "fid", Some(3));
        assert_eq!(q.sql, "DELETE FROM \"gis\".\"roads\" WHERE \"fid\" = $1");
    }

    #[test]
    fn delete_is_unscoped_in_layers_only_mode() {
        let q = delete_layer_rows("gis", "roads", "file_id", None);
        assert_eq!(q.sql, "DELETE FROM \"gis\".\"roads\"");
        assert!(q.params.is_empty());
    }
}
