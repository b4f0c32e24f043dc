//! Convert attribute values to types that sqlx can bind.

use crate::attr::AttrValue;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value bound to one PostgreSQL placeholder.
#[derive(Clone, Debug)]
pub enum PgBind {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Json(Value),
}

impl PgBind {
    pub fn from_attr(v: &AttrValue) -> Self {
        match v {
            AttrValue::Null => PgBind::Null,
            AttrValue::Bool(b) => PgBind::Bool(*b),
            AttrValue::Int(n) => PgBind::I64(*n),
            AttrValue::Float(f) => PgBind::F64(*f),
            AttrValue::Text(s) => PgBind::String(s.clone()),
            AttrValue::Vector(_) => PgBind::Json(v.to_json()),
            AttrValue::Blob(b) => PgBind::Bytes(b.clone()),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBind {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBind::Null => <Option<i32> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            PgBind::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBind::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBind::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBind::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            PgBind::Bytes(b) => {
                let b_ref: &[u8] = b.as_slice();
                <&[u8] as Encode<Postgres>>::encode_by_ref(&b_ref, buf)?
            }
            PgBind::Json(v) => <Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBind::Null | PgBind::String(_) => PgTypeInfo::with_name("TEXT"),
            PgBind::Bool(_) => PgTypeInfo::with_name("BOOL"),
            PgBind::I64(_) => PgTypeInfo::with_name("INT8"),
            PgBind::F64(_) => PgTypeInfo::with_name("FLOAT8"),
            PgBind::Bytes(_) => PgTypeInfo::with_name("BYTEA"),
            PgBind::Json(_) => PgTypeInfo::with_name("JSONB"),
        })
    }
}

impl sqlx::Type<Postgres> for PgBind {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
