//! Reader collaborators: the parsed drawing exposed as layers of entities,
//! plus handle-based lookup for entities that reference other entities
//! (multileader -> style).

use crate::entity::CadEntity;
use std::collections::HashMap;

/// One named layer with its entities in drawing order.
#[derive(Clone, Debug)]
pub struct Layer {
    pub name: String,
    pub entities: Vec<CadEntity>,
}

/// Resolve an entity by its drawing handle.
pub trait EntityLookup: Send + Sync {
    fn by_handle(&self, handle: &str) -> Option<&CadEntity>;
}

/// The parsed drawing, grouped by layer. Implemented by the external CAD
/// parser; `MemoryDocument` below serves embedders and tests.
pub trait DocumentReader: EntityLookup {
    fn layers(&self) -> &[Layer];
}

/// In-memory document over already-parsed entities.
#[derive(Default)]
pub struct MemoryDocument {
    layers: Vec<Layer>,
    by_handle: HashMap<String, (usize, usize)>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        MemoryDocument::default()
    }

    pub fn push_layer(&mut self, name: &str, entities: Vec<CadEntity>) {
        let layer_idx = self.layers.len();
        for (i, e) in entities.iter().enumerate() {
            let handle = e.common().handle.clone();
            if !handle.is_empty() {
                self.by_handle.insert(handle, (layer_idx, i));
            }
        }
        self.layers.push(Layer { name: name.to_string(), entities });
    }
}

impl EntityLookup for MemoryDocument {
    fn by_handle(&self, handle: &str) -> Option<&CadEntity> {
        let (l, i) = *self.by_handle.get(handle)?;
        self.layers.get(l)?.entities.get(i)
    }
}

impl DocumentReader for MemoryDocument {
    fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CommonAttributes, Point3};

    #[test]
    fn lookup_finds_entities_across_layers() {
        let mut doc = MemoryDocument::new();
        doc.push_layer(
            "walls",
            vec![CadEntity::Point {
                common: CommonAttributes { handle: "a1".into(), ..Default::default() },
                location: Point3::xy(0.0, 0.0),
            }],
        );
        doc.push_layer(
            "doors",
            vec![CadEntity::Point {
                common: CommonAttributes { handle: "b2".into(), ..Default::default() },
                location: Point3::xy(1.0, 1.0),
            }],
        );
        assert!(doc.by_handle("a1").is_some());
        assert!(doc.by_handle("b2").is_some());
        assert!(doc.by_handle("zz").is_none());
        assert_eq!(doc.layers().len(), 2);
    }
}
