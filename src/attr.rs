//! Attribute bags: the per-row extra_data payload. Insertion-ordered so the
//! jsonb output lists the canonical subset first, then entity-specific
//! fields in the order the converter produced them.

use crate::entity::{CommonAttributes, Point3};
use serde_json::{Map, Value};

/// One attribute value. Vectors are the normalized representation of
/// spatial coordinates inside extra data (2 or 3 numeric elements).
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Vector(Vec<f64>),
    Blob(Vec<u8>),
}

impl AttrValue {
    pub fn point(p: &Point3) -> AttrValue {
        AttrValue::Vector(vec![p.x, p.y, p.z])
    }

    /// Flatten to JSON for the jsonb column. Blobs become lowercase hex so
    /// opaque payloads (e.g. ACIS data) survive verbatim.
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Int(n) => Value::from(*n),
            AttrValue::Float(f) => Value::from(*f),
            AttrValue::Text(s) => Value::String(s.clone()),
            AttrValue::Vector(v) => Value::Array(v.iter().map(|f| Value::from(*f)).collect()),
            AttrValue::Blob(b) => {
                let mut s = String::with_capacity(b.len() * 2);
                for byte in b {
                    s.push_str(&format!("{:02x}", byte));
                }
                Value::String(s)
            }
        }
    }

    /// Rehydrate from JSON. The inverse of [`to_json`] for everything except
    /// blobs, which come back as hex text.
    pub fn from_json(v: &Value) -> AttrValue {
        match v {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    AttrValue::Int(i)
                } else {
                    AttrValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => AttrValue::Text(s.clone()),
            Value::Array(items) => {
                let nums: Option<Vec<f64>> = items.iter().map(Value::as_f64).collect();
                match nums {
                    Some(v) => AttrValue::Vector(v),
                    None => AttrValue::Text(Value::Array(items.clone()).to_string()),
                }
            }
            Value::Object(_) => AttrValue::Text(v.to_string()),
        }
    }
}

/// Ordered field name -> value mapping.
#[derive(Clone, Debug, Default)]
pub struct AttributeBag {
    fields: Vec<(String, AttrValue)>,
}

impl AttributeBag {
    pub fn new() -> Self {
        AttributeBag { fields: Vec::new() }
    }

    /// Bag pre-seeded with the canonical common subset.
    pub fn with_common(common: &CommonAttributes) -> Self {
        let mut bag = AttributeBag::new();
        bag.set("color", AttrValue::Int(common.color));
        bag.set("linetype", AttrValue::Text(common.linetype.clone()));
        bag.set("lineweight", AttrValue::Int(common.lineweight));
        bag.set("ltscale", AttrValue::Float(common.ltscale));
        bag.set("invisible", AttrValue::Bool(common.invisible));
        bag.set(
            "true_color",
            common.true_color.map(AttrValue::Int).unwrap_or(AttrValue::Null),
        );
        bag.set(
            "transparency",
            common.transparency.map(AttrValue::Int).unwrap_or(AttrValue::Null),
        );
        bag
    }

    /// Insert or overwrite, preserving the original position on overwrite.
    pub fn set(&mut self, name: &str, value: AttrValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Rename fields through a mapping; names absent from the mapping pass
    /// through unchanged.
    pub fn remap(&self, mapping: &std::collections::HashMap<String, String>) -> AttributeBag {
        let fields = self
            .fields
            .iter()
            .map(|(n, v)| {
                let name = mapping.get(n).cloned().unwrap_or_else(|| n.clone());
                (name, v.clone())
            })
            .collect();
        AttributeBag { fields }
    }

    /// jsonb payload for the extra_data column.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (n, v) in &self.fields {
            map.insert(n.clone(), v.to_json());
        }
        Value::Object(map)
    }
}
