//! Identifier handling: layer names become table identifiers, and every
//! identifier interpolated into SQL goes through quoting.

/// Quote identifier for PostgreSQL (doubled inner quotes).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Schema-qualified, quoted table name.
pub fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

/// Normalize a layer name to a table identifier: blanks and hyphens become
/// underscores, everything is lowercased, and a leading digit gets an
/// underscore prefix so the identifier never needs quoting to parse.
pub fn layer_table_ident(layer_name: &str) -> String {
    let mut out = String::with_capacity(layer_name.len());
    for c in layer_name.trim().chars() {
        match c {
            ' ' | '-' | '\t' => out.push('_'),
            c => out.extend(c.to_lowercase()),
        }
    }
    if out.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        out.insert(0, '_');
    }
    out
}
