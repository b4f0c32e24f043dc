//! CAD entity model: one closed tagged union over every drawing-primitive
//! kind the converter understands, plus an explicit Unsupported variant so
//! unknown kinds are a value, not a runtime guess.

use serde::{Deserialize, Serialize};

/// A 3-D coordinate. Drawings that only carry 2-D data use z = 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    pub fn xy(x: f64, y: f64) -> Self {
        Point3 { x, y, z: 0.0 }
    }
}

/// Display/style attributes every entity carries regardless of kind.
/// These land in the canonical subset of the attribute bag.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommonAttributes {
    /// Hex entity handle from the source drawing; unique within the drawing.
    pub handle: String,
    pub color: i64,
    pub linetype: String,
    pub lineweight: i64,
    pub ltscale: f64,
    pub invisible: bool,
    #[serde(default)]
    pub true_color: Option<i64>,
    #[serde(default)]
    pub transparency: Option<i64>,
}

/// Dimension sub-kind; kept as data because dimensions convert to
/// attributes only, not geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    Linear,
    Aligned,
    Angular,
    Radial,
    Diametric,
    Ordinate,
    Other,
}

/// One boundary loop of a hatch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HatchLoop {
    pub vertices: Vec<Point3>,
}

/// One leader line of a multileader: an ordered vertex chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderLine {
    pub vertices: Vec<Point3>,
}

/// A drawing primitive, tagged by kind. Produced by the document reader
/// collaborator; never mutated by this crate.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CadEntity {
    Point {
        common: CommonAttributes,
        location: Point3,
    },
    Line {
        common: CommonAttributes,
        start: Point3,
        end: Point3,
    },
    /// Covers both POLYLINE and LWPOLYLINE.
    Polyline {
        common: CommonAttributes,
        vertices: Vec<Point3>,
        closed: bool,
    },
    Text {
        common: CommonAttributes,
        insertion: Point3,
        value: String,
        height: f64,
        rotation: f64,
    },
    MText {
        common: CommonAttributes,
        insertion: Point3,
        value: String,
        height: f64,
    },
    Circle {
        common: CommonAttributes,
        center: Point3,
        radius: f64,
    },
    Arc {
        common: CommonAttributes,
        center: Point3,
        radius: f64,
        /// Radians.
        start_angle: f64,
        end_angle: f64,
    },
    Ellipse {
        common: CommonAttributes,
        center: Point3,
        /// Endpoint of the major axis relative to the center.
        major_axis: Point3,
        /// Minor-to-major axis length ratio.
        ratio: f64,
        start_param: f64,
        end_param: f64,
    },
    Helix {
        common: CommonAttributes,
        base: Point3,
        radius: f64,
        turns: f64,
        turn_height: f64,
    },
    Spline {
        common: CommonAttributes,
        control_points: Vec<Point3>,
        degree: i64,
        closed: bool,
    },
    MultiLeader {
        common: CommonAttributes,
        base: Point3,
        /// Handle of the mleader style entity, resolved through EntityLookup.
        style_handle: String,
        leader_lines: Vec<LeaderLine>,
        text: String,
    },
    /// mleader style record; only ever referenced by handle from MultiLeader.
    MLeaderStyle {
        common: CommonAttributes,
        name: String,
    },
    BlockReference {
        common: CommonAttributes,
        insertion: Point3,
        block_name: String,
        scale: Point3,
        rotation: f64,
    },
    /// Covers SOLID, TRACE and 3DFACE: 3 or 4 corner vertices.
    Solid {
        common: CommonAttributes,
        vertices: Vec<Point3>,
    },
    /// Covers REGION, BODY and 3DSOLID; the modeler payload is opaque.
    Region {
        common: CommonAttributes,
        acis_data: Vec<u8>,
    },
    Mesh {
        common: CommonAttributes,
        vertex_count: i64,
        face_count: i64,
    },
    Hatch {
        common: CommonAttributes,
        pattern: String,
        loops: Vec<HatchLoop>,
    },
    Leader {
        common: CommonAttributes,
        vertices: Vec<Point3>,
    },
    Shape {
        common: CommonAttributes,
        insertion: Point3,
        name: String,
        size: f64,
    },
    Viewport {
        common: CommonAttributes,
        center: Point3,
        width: f64,
        height: f64,
    },
    Image {
        common: CommonAttributes,
        insertion: Point3,
        path: String,
        width: f64,
        height: f64,
    },
    Dimension {
        common: CommonAttributes,
        // Serialized as dimension_kind: the enum's internal "kind" tag would
        // collide with a field of that name.
        #[serde(rename = "dimension_kind")]
        kind: DimensionKind,
        definition_point: Point3,
        text: String,
    },
    /// Covers RAY (one direction) and XLINE (infinite both ways).
    Ray {
        common: CommonAttributes,
        start: Point3,
        direction: Point3,
        infinite_both_ways: bool,
    },
    AttributeEntity {
        common: CommonAttributes,
        insertion: Point3,
        tag: String,
        value: String,
    },
    SeqEnd {
        common: CommonAttributes,
    },
    /// Anything the reader recognized but this model does not.
    Unsupported {
        common: CommonAttributes,
        #[serde(rename = "entity_kind")]
        kind: String,
    },
}

impl CadEntity {
    pub fn common(&self) -> &CommonAttributes {
        match self {
            CadEntity::Point { common, .. }
            | CadEntity::Line { common, .. }
            | CadEntity::Polyline { common, .. }
            | CadEntity::Text { common, .. }
            | CadEntity::MText { common, .. }
            | CadEntity::Circle { common, .. }
            | CadEntity::Arc { common, .. }
            | CadEntity::Ellipse { common, .. }
            | CadEntity::Helix { common, .. }
            | CadEntity::Spline { common, .. }
            | CadEntity::MultiLeader { common, .. }
            | CadEntity::MLeaderStyle { common, .. }
            | CadEntity::BlockReference { common, .. }
            | CadEntity::Solid { common, .. }
            | CadEntity::Region { common, .. }
            | CadEntity::Mesh { common, .. }
            | CadEntity::Hatch { common, .. }
            | CadEntity::Leader { common, .. }
            | CadEntity::Shape { common, .. }
            | CadEntity::Viewport { common, .. }
            | CadEntity::Image { common, .. }
            | CadEntity::Dimension { common, .. }
            | CadEntity::Ray { common, .. }
            | CadEntity::AttributeEntity { common, .. }
            | CadEntity::SeqEnd { common }
            | CadEntity::Unsupported { common, .. } => common,
        }
    }

    /// Kind label used in diagnostics and in the geom_type column for
    /// no-geometry rows.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CadEntity::Point { .. } => "POINT",
            CadEntity::Line { .. } => "LINE",
            CadEntity::Polyline { .. } => "POLYLINE",
            CadEntity::Text { .. } => "TEXT",
            CadEntity::MText { .. } => "MTEXT",
            CadEntity::Circle { .. } => "CIRCLE",
            CadEntity::Arc { .. } => "ARC",
            CadEntity::Ellipse { .. } => "ELLIPSE",
            CadEntity::Helix { .. } => "HELIX",
            CadEntity::Spline { .. } => "SPLINE",
            CadEntity::MultiLeader { .. } => "MULTILEADER",
            CadEntity::MLeaderStyle { .. } => "MLEADERSTYLE",
            CadEntity::BlockReference { .. } => "INSERT",
            CadEntity::Solid { .. } => "SOLID",
            CadEntity::Region { .. } => "REGION",
            CadEntity::Mesh { .. } => "MESH",
            CadEntity::Hatch { .. } => "HATCH",
            CadEntity::Leader { .. } => "LEADER",
            CadEntity::Shape { .. } => "SHAPE",
            CadEntity::Viewport { .. } => "VIEWPORT",
            CadEntity::Image { .. } => "IMAGE",
            CadEntity::Dimension { .. } => "DIMENSION",
            CadEntity::Ray { infinite_both_ways, .. } => {
                if *infinite_both_ways {
                    "XLINE"
                } else {
                    "RAY"
                }
            }
            CadEntity::AttributeEntity { .. } => "ATTRIB",
            CadEntity::SeqEnd { .. } => "SEQEND",
            CadEntity::Unsupported { .. } => "UNSUPPORTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_with_kind_fields_round_trip_through_serde() {
        let dim = CadEntity::Dimension {
            common: CommonAttributes::default(),
            kind: DimensionKind::Aligned,
            definition_point: Point3::xy(1.0, 2.0),
            text: "3.5".into(),
        };
        let unsupported = CadEntity::Unsupported {
            common: CommonAttributes::default(),
            kind: "WIPEOUT".into(),
        };
        for entity in [dim, unsupported] {
            let json = serde_json::to_value(&entity).unwrap();
            // The variant tag owns "kind"; the fields serialize under their
            // renamed keys.
            assert!(json.get("kind").unwrap().is_string());
            let back: CadEntity = serde_json::from_value(json.clone()).unwrap();
            assert_eq!(back.kind_name(), entity.kind_name());
        }
        let wiped = serde_json::json!({
            "kind": "unsupported",
            "common": CommonAttributes::default(),
            "entity_kind": "WIPEOUT"
        });
        let parsed: CadEntity = serde_json::from_value(wiped).unwrap();
        assert!(matches!(parsed, CadEntity::Unsupported { kind, .. } if kind == "WIPEOUT"));
    }
}
