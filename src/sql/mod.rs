//! SQL building: parameterized statements for layer rows, reflection, and
//! the file table.

mod builder;
mod params;

pub use builder::{
    delete_layer_rows, insert_layer_row, reflect_columns_sql, QueryBuf, RowValue,
};
pub use params::PgBind;
