//! Entity conversion: one CAD entity in, one optional geometry plus an
//! attribute bag out. Pure; no I/O. A conversion failure degrades to a
//! skipped entity, never an aborted batch.

use crate::attr::{AttrValue, AttributeBag};
use crate::document::EntityLookup;
use crate::entity::{CadEntity, Point3};
use crate::error::ConvertError;
use crate::geometry::{close_ring, Geometry};
use std::f64::consts::TAU;
use tracing::warn;

/// Sample count for discretized curves (circle, arc, ellipse, helix).
const CURVE_SAMPLES: usize = 100;

/// Result of converting one entity. `geometry` is legitimately `None` for
/// kinds that only carry attributes (region, mesh, dimension, mtext, ...).
#[derive(Clone, Debug)]
pub struct Converted {
    pub geometry: Option<Geometry>,
    pub geom_type: String,
    pub attributes: AttributeBag,
    pub notes: Option<String>,
}

/// Convert one entity. Unknown kinds and per-entity failures are logged and
/// collapse to `None`: zero rows for this entity, never a null-geometry row.
pub fn convert(entity: &CadEntity, lookup: &dyn EntityLookup) -> Option<Converted> {
    match convert_inner(entity, lookup) {
        Ok(converted) => Some(converted),
        Err(e) => {
            warn!(
                handle = entity.common().handle.as_str(),
                kind = entity.kind_name(),
                error = %e,
                "entity skipped"
            );
            None
        }
    }
}

fn convert_inner(
    entity: &CadEntity,
    lookup: &dyn EntityLookup,
) -> Result<Converted, ConvertError> {
    let mut attrs = AttributeBag::with_common(entity.common());

    let (geometry, notes) = match entity {
        CadEntity::Point { location, .. } => (Some(Geometry::Point(*location)), None),

        CadEntity::Line { start, end, .. } => {
            (Some(Geometry::LineString(vec![*start, *end])), None)
        }

        CadEntity::Polyline { vertices, closed, .. } => {
            // A closed ring needs 3 distinct vertices to form a valid polygon.
            require_vertices(entity, vertices, if *closed { 3 } else { 2 })?;
            attrs.set("vertices", vertex_list(vertices));
            attrs.set("closed", AttrValue::Bool(*closed));
            let geom = if *closed {
                Geometry::Polygon(close_ring(vertices.clone()))
            } else {
                Geometry::LineString(vertices.clone())
            };
            (Some(geom), None)
        }

        CadEntity::Text { insertion, value, height, rotation, .. } => {
            attrs.set("height", AttrValue::Float(*height));
            attrs.set("rotation", AttrValue::Float(*rotation));
            (Some(Geometry::Point(*insertion)), Some(value.clone()))
        }

        CadEntity::MText { insertion, value, height, .. } => {
            attrs.set("insertion", AttrValue::point(insertion));
            attrs.set("height", AttrValue::Float(*height));
            (None, Some(value.clone()))
        }

        CadEntity::Circle { center, radius, .. } => {
            attrs.set("center", AttrValue::point(center));
            attrs.set("radius", AttrValue::Float(*radius));
            let ring = sample_arc(*center, *radius, 0.0, TAU);
            (Some(Geometry::Polygon(close_ring(ring))), None)
        }

        CadEntity::Arc { center, radius, start_angle, end_angle, .. } => {
            attrs.set("center", AttrValue::point(center));
            attrs.set("radius", AttrValue::Float(*radius));
            attrs.set("start_angle", AttrValue::Float(*start_angle));
            attrs.set("end_angle", AttrValue::Float(*end_angle));
            let mut end = *end_angle;
            if end <= *start_angle {
                end += TAU;
            }
            (Some(Geometry::LineString(sample_arc(*center, *radius, *start_angle, end))), None)
        }

        CadEntity::Ellipse { center, major_axis, ratio, start_param, end_param, .. } => {
            attrs.set("center", AttrValue::point(center));
            attrs.set("major_axis", AttrValue::point(major_axis));
            attrs.set("ratio", AttrValue::Float(*ratio));
            let mut end = *end_param;
            if end <= *start_param {
                end += TAU;
            }
            let pts = sample_ellipse(*center, *major_axis, *ratio, *start_param, end);
            (Some(Geometry::LineString(pts)), None)
        }

        CadEntity::Helix { base, radius, turns, turn_height, .. } => {
            attrs.set("base", AttrValue::point(base));
            attrs.set("radius", AttrValue::Float(*radius));
            attrs.set("turns", AttrValue::Float(*turns));
            attrs.set("turn_height", AttrValue::Float(*turn_height));
            (Some(Geometry::LineString(sample_helix(*base, *radius, *turns, *turn_height))), None)
        }

        CadEntity::Spline { control_points, degree, closed, .. } => {
            require_vertices(entity, control_points, if *closed { 3 } else { 2 })?;
            attrs.set("control_points", vertex_list(control_points));
            attrs.set("degree", AttrValue::Int(*degree));
            attrs.set("closed", AttrValue::Bool(*closed));
            let geom = if *closed {
                Geometry::Polygon(close_ring(control_points.clone()))
            } else {
                Geometry::LineString(control_points.clone())
            };
            (Some(geom), None)
        }

        CadEntity::MultiLeader { base, style_handle, leader_lines, text, .. } => {
            let style_name = match lookup.by_handle(style_handle) {
                Some(CadEntity::MLeaderStyle { name, .. }) => name.clone(),
                Some(_) | None => {
                    return Err(ConvertError::DanglingReference {
                        handle: entity.common().handle.clone(),
                        reference: style_handle.clone(),
                    })
                }
            };
            attrs.set("style", AttrValue::Text(style_name));
            for (i, line) in leader_lines.iter().enumerate() {
                attrs.set(&format!("leader_line_{i}"), vertex_list(&line.vertices));
            }
            (Some(Geometry::Point(*base)), Some(text.clone()))
        }

        CadEntity::MLeaderStyle { .. } => {
            // Style records are resolution targets, not rows.
            return Err(ConvertError::UnsupportedKind {
                kind: "MLEADERSTYLE".into(),
                handle: entity.common().handle.clone(),
            });
        }

        CadEntity::BlockReference { insertion, block_name, scale, rotation, .. } => {
            attrs.set("block_name", AttrValue::Text(block_name.clone()));
            attrs.set("scale", AttrValue::point(scale));
            attrs.set("rotation", AttrValue::Float(*rotation));
            (Some(Geometry::Point(*insertion)), None)
        }

        CadEntity::Solid { vertices, .. } => {
            require_vertices(entity, vertices, 3)?;
            // A 4-vertex solid whose last corner repeats the first is a triangle.
            let mut ring: Vec<Point3> = vertices.clone();
            if ring.len() == 4 && ring[3] == ring[0] {
                ring.truncate(3);
            }
            attrs.set("vertices", vertex_list(&ring));
            (Some(Geometry::Polygon(close_ring(ring))), None)
        }

        CadEntity::Region { acis_data, .. } => {
            attrs.set("acis_data", AttrValue::Blob(acis_data.clone()));
            (None, None)
        }

        CadEntity::Mesh { vertex_count, face_count, .. } => {
            attrs.set("vertex_count", AttrValue::Int(*vertex_count));
            attrs.set("face_count", AttrValue::Int(*face_count));
            (None, None)
        }

        CadEntity::Hatch { pattern, loops, .. } => {
            if loops.is_empty() {
                return Err(ConvertError::Invalid {
                    handle: entity.common().handle.clone(),
                    message: "hatch has no boundary loops".into(),
                });
            }
            for (i, l) in loops.iter().enumerate() {
                if l.vertices.len() < 3 {
                    return Err(ConvertError::Invalid {
                        handle: entity.common().handle.clone(),
                        message: format!(
                            "hatch loop {i} has {} vertices, needs at least 3",
                            l.vertices.len()
                        ),
                    });
                }
            }
            attrs.set("pattern", AttrValue::Text(pattern.clone()));
            attrs.set("loop_count", AttrValue::Int(loops.len() as i64));
            let geom = if loops.len() == 1 {
                Geometry::Polygon(close_ring(loops[0].vertices.clone()))
            } else {
                Geometry::MultiPolygon(
                    loops.iter().map(|l| close_ring(l.vertices.clone())).collect(),
                )
            };
            (Some(geom), None)
        }

        CadEntity::Leader { vertices, .. } => {
            require_vertices(entity, vertices, 2)?;
            attrs.set("vertices", vertex_list(vertices));
            (Some(Geometry::LineString(vertices.clone())), None)
        }

        CadEntity::Shape { insertion, name, size, .. } => {
            attrs.set("shape_name", AttrValue::Text(name.clone()));
            attrs.set("size", AttrValue::Float(*size));
            (Some(Geometry::Point(*insertion)), None)
        }

        CadEntity::Viewport { center, width, height, .. } => {
            attrs.set("width", AttrValue::Float(*width));
            attrs.set("height", AttrValue::Float(*height));
            (Some(Geometry::Point(*center)), None)
        }

        CadEntity::Image { insertion, path, width, height, .. } => {
            attrs.set("image_path", AttrValue::Text(path.clone()));
            attrs.set("image_size", AttrValue::Vector(vec![*width, *height]));
            (Some(Geometry::Point(*insertion)), None)
        }

        CadEntity::Dimension { kind, definition_point, text, .. } => {
            attrs.set("dimension_kind", AttrValue::Text(format!("{kind:?}").to_lowercase()));
            attrs.set("definition_point", AttrValue::point(definition_point));
            (None, Some(text.clone()))
        }

        CadEntity::Ray { start, direction, infinite_both_ways, .. } => {
            attrs.set("direction", AttrValue::point(direction));
            attrs.set("infinite_both_ways", AttrValue::Bool(*infinite_both_ways));
            (Some(Geometry::Point(*start)), None)
        }

        CadEntity::AttributeEntity { insertion, tag, value, .. } => {
            attrs.set("tag", AttrValue::Text(tag.clone()));
            (Some(Geometry::Point(*insertion)), Some(value.clone()))
        }

        CadEntity::SeqEnd { .. } => (None, None),

        CadEntity::Unsupported { kind, .. } => {
            return Err(ConvertError::UnsupportedKind {
                kind: kind.clone(),
                handle: entity.common().handle.clone(),
            });
        }
    };

    let geom_type = geometry
        .as_ref()
        .map(|g| g.geom_type().to_string())
        .unwrap_or_else(|| entity.kind_name().to_string());

    Ok(Converted { geometry, geom_type, attributes: attrs, notes })
}

fn require_vertices(
    entity: &CadEntity,
    vertices: &[Point3],
    min: usize,
) -> Result<(), ConvertError> {
    if vertices.len() < min {
        return Err(ConvertError::Invalid {
            handle: entity.common().handle.clone(),
            message: format!("needs at least {min} vertices, got {}", vertices.len()),
        });
    }
    Ok(())
}

fn vertex_list(vertices: &[Point3]) -> AttrValue {
    let flat: Vec<f64> = vertices.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
    AttrValue::Vector(flat)
}

/// Sample a circular arc at CURVE_SAMPLES points over [start, end] radians.
fn sample_arc(center: Point3, radius: f64, start: f64, end: f64) -> Vec<Point3> {
    let step = (end - start) / (CURVE_SAMPLES - 1) as f64;
    (0..CURVE_SAMPLES)
        .map(|i| {
            let a = start + step * i as f64;
            Point3::new(center.x + radius * a.cos(), center.y + radius * a.sin(), center.z)
        })
        .collect()
}

/// Sample an axis-aligned-parameterized ellipse over [start, end] params.
/// The major axis gives orientation; the minor axis is ratio-scaled and
/// perpendicular in the XY plane.
fn sample_ellipse(
    center: Point3,
    major_axis: Point3,
    ratio: f64,
    start: f64,
    end: f64,
) -> Vec<Point3> {
    let (mx, my) = (major_axis.x, major_axis.y);
    let (nx, ny) = (-my * ratio, mx * ratio);
    let step = (end - start) / (CURVE_SAMPLES - 1) as f64;
    (0..CURVE_SAMPLES)
        .map(|i| {
            let t = start + step * i as f64;
            Point3::new(
                center.x + mx * t.cos() + nx * t.sin(),
                center.y + my * t.cos() + ny * t.sin(),
                center.z,
            )
        })
        .collect()
}

/// Sample a helix over 0..2π·turns with a linear height ramp.
fn sample_helix(base: Point3, radius: f64, turns: f64, turn_height: f64) -> Vec<Point3> {
    let total_angle = TAU * turns;
    let total_height = turn_height * turns;
    let step = total_angle / (CURVE_SAMPLES - 1) as f64;
    (0..CURVE_SAMPLES)
        .map(|i| {
            let a = step * i as f64;
            let frac = if total_angle == 0.0 { 0.0 } else { a / total_angle };
            Point3::new(
                base.x + radius * a.cos(),
                base.y + radius * a.sin(),
                base.z + total_height * frac,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use crate::entity::{CommonAttributes, DimensionKind, HatchLoop, LeaderLine};

    fn common(handle: &str) -> CommonAttributes {
        CommonAttributes { handle: handle.into(), ..Default::default() }
    }

    fn empty_lookup() -> MemoryDocument {
        MemoryDocument::new()
    }

    fn sample_entities() -> Vec<CadEntity> {
        vec![
            CadEntity::Point { common: common("1"), location: Point3::xy(1.0, 2.0) },
            CadEntity::Line {
                common: common("2"),
                start: Point3::xy(0.0, 0.0),
                end: Point3::xy(5.0, 5.0),
            },
            CadEntity::Polyline {
                common: common("3"),
                vertices: vec![Point3::xy(0.0, 0.0), Point3::xy(1.0, 0.0), Point3::xy(1.0, 1.0)],
                closed: true,
            },
            CadEntity::Text {
                common: common("4"),
                insertion: Point3::xy(0.0, 0.0),
                value: "label".into(),
                height: 2.5,
                rotation: 0.0,
            },
            CadEntity::MText {
                common: common("5"),
                insertion: Point3::xy(0.0, 0.0),
                value: "para".into(),
                height: 2.5,
            },
            CadEntity::Circle { common: common("6"), center: Point3::xy(0.0, 0.0), radius: 1.0 },
            CadEntity::Arc {
                common: common("7"),
                center: Point3::xy(0.0, 0.0),
                radius: 1.0,
                start_angle: 0.0,
                end_angle: 1.0,
            },
            CadEntity::Ellipse {
                common: common("8"),
                center: Point3::xy(0.0, 0.0),
                major_axis: Point3::xy(2.0, 0.0),
                ratio: 0.5,
                start_param: 0.0,
                end_param: TAU,
            },
            CadEntity::Helix {
                common: common("9"),
                base: Point3::xy(0.0, 0.0),
                radius: 1.0,
                turns: 3.0,
                turn_height: 2.0,
            },
            CadEntity::Spline {
                common: common("a"),
                control_points: vec![Point3::xy(0.0, 0.0), Point3::xy(1.0, 2.0)],
                degree: 3,
                closed: false,
            },
            CadEntity::BlockReference {
                common: common("b"),
                insertion: Point3::xy(3.0, 3.0),
                block_name: "DOOR".into(),
                scale: Point3::new(1.0, 1.0, 1.0),
                rotation: 0.0,
            },
            CadEntity::Solid {
                common: common("c"),
                vertices: vec![
                    Point3::xy(0.0, 0.0),
                    Point3::xy(1.0, 0.0),
                    Point3::xy(1.0, 1.0),
                    Point3::xy(0.0, 1.0),
                ],
            },
            CadEntity::Region { common: common("d"), acis_data: vec![1, 2, 3] },
            CadEntity::Mesh { common: common("e"), vertex_count: 8, face_count: 6 },
            CadEntity::Hatch {
                common: common("f"),
                pattern: "SOLID".into(),
                loops: vec![HatchLoop {
                    vertices: vec![Point3::xy(0.0, 0.0), Point3::xy(1.0, 0.0), Point3::xy(1.0, 1.0)],
                }],
            },
            CadEntity::Leader {
                common: common("10"),
                vertices: vec![Point3::xy(0.0, 0.0), Point3::xy(2.0, 2.0)],
            },
            CadEntity::Shape {
                common: common("11"),
                insertion: Point3::xy(0.0, 0.0),
                name: "ARROW".into(),
                size: 1.0,
            },
            CadEntity::Viewport {
                common: common("12"),
                center: Point3::xy(0.0, 0.0),
                width: 100.0,
                height: 50.0,
            },
            CadEntity::Image {
                common: common("13"),
                insertion: Point3::xy(0.0, 0.0),
                path: "plan.png".into(),
                width: 640.0,
                height: 480.0,
            },
            CadEntity::Dimension {
                common: common("14"),
                kind: DimensionKind::Linear,
                definition_point: Point3::xy(0.0, 0.0),
                text: "12.5".into(),
            },
            CadEntity::Ray {
                common: common("15"),
                start: Point3::xy(0.0, 0.0),
                direction: Point3::new(1.0, 0.0, 0.0),
                infinite_both_ways: false,
            },
            CadEntity::AttributeEntity {
                common: common("16"),
                insertion: Point3::xy(0.0, 0.0),
                tag: "ROOM".into(),
                value: "101".into(),
            },
            CadEntity::SeqEnd { common: common("17") },
        ]
    }

    #[test]
    fn every_supported_kind_converts_without_panicking() {
        let lookup = empty_lookup();
        for entity in sample_entities() {
            let converted = convert(&entity, &lookup)
                .unwrap_or_else(|| panic!("{} did not convert", entity.kind_name()));
            if let Some(g) = &converted.geometry {
                assert!(g.to_ewkt().starts_with("SRID=4326;"));
            } else {
                // Attribute-only kinds still carry the canonical subset.
                assert!(converted.attributes.get("color").is_some());
            }
        }
    }

    #[test]
    fn unsupported_kind_yields_none() {
        let entity = CadEntity::Unsupported { common: common("ff"), kind: "WIPEOUT".into() };
        assert!(convert(&entity, &empty_lookup()).is_none());
    }

    #[test]
    fn circle_discretizes_to_closed_polygon() {
        let entity =
            CadEntity::Circle { common: common("1"), center: Point3::xy(0.0, 0.0), radius: 2.0 };
        let converted = convert(&entity, &empty_lookup()).unwrap();
        match converted.geometry.unwrap() {
            Geometry::Polygon(ring) => {
                assert_eq!(ring.len(), CURVE_SAMPLES + 1);
                assert_eq!(ring.first(), ring.last());
                for p in &ring {
                    let r = (p.x * p.x + p.y * p.y).sqrt();
                    assert!((r - 2.0).abs() < 1e-9);
                }
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn open_polyline_is_a_linestring_with_vertex_attribute() {
        let entity = CadEntity::Polyline {
            common: common("1"),
            vertices: vec![Point3::xy(0.0, 0.0), Point3::xy(1.0, 0.0)],
            closed: false,
        };
        let converted = convert(&entity, &empty_lookup()).unwrap();
        assert_eq!(converted.geom_type, "LINESTRING");
        assert_eq!(
            converted.attributes.get("vertices"),
            Some(&AttrValue::Vector(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]))
        );
    }

    #[test]
    fn quad_solid_with_repeated_corner_collapses_to_triangle() {
        let entity = CadEntity::Solid {
            common: common("1"),
            vertices: vec![
                Point3::xy(0.0, 0.0),
                Point3::xy(1.0, 0.0),
                Point3::xy(0.5, 1.0),
                Point3::xy(0.0, 0.0),
            ],
        };
        let converted = convert(&entity, &empty_lookup()).unwrap();
        match converted.geometry.unwrap() {
            Geometry::Polygon(ring) => assert_eq!(ring.len(), 4), // 3 corners + closure
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn multi_loop_hatch_becomes_multipolygon() {
        let entity = CadEntity::Hatch {
            common: common("1"),
            pattern: "ANSI31".into(),
            loops: vec![
                HatchLoop {
                    vertices: vec![Point3::xy(0.0, 0.0), Point3::xy(1.0, 0.0), Point3::xy(1.0, 1.0)],
                },
                HatchLoop {
                    vertices: vec![Point3::xy(5.0, 5.0), Point3::xy(6.0, 5.0), Point3::xy(6.0, 6.0)],
                },
            ],
        };
        let converted = convert(&entity, &empty_lookup()).unwrap();
        assert_eq!(converted.geom_type, "MULTIPOLYGON");
    }

    #[test]
    fn multileader_resolves_style_through_lookup() {
        let style = CadEntity::MLeaderStyle { common: common("s1"), name: "Standard".into() };
        let mut doc = MemoryDocument::new();
        doc.push_layer("0", vec![style]);
        let entity = CadEntity::MultiLeader {
            common: common("m1"),
            base: Point3::xy(4.0, 4.0),
            style_handle: "s1".into(),
            leader_lines: vec![LeaderLine {
                vertices: vec![Point3::xy(0.0, 0.0), Point3::xy(4.0, 4.0)],
            }],
            text: "note".into(),
        };
        let converted = convert(&entity, &doc).unwrap();
        assert_eq!(converted.attributes.get("style"), Some(&AttrValue::Text("Standard".into())));
        assert!(converted.attributes.get("leader_line_0").is_some());
        assert_eq!(converted.geom_type, "POINT");
    }

    #[test]
    fn multileader_with_dangling_style_is_skipped() {
        let entity = CadEntity::MultiLeader {
            common: common("m1"),
            base: Point3::xy(0.0, 0.0),
            style_handle: "nope".into(),
            leader_lines: vec![],
            text: String::new(),
        };
        assert!(convert(&entity, &empty_lookup()).is_none());
    }

    #[test]
    fn helix_ramps_height_linearly() {
        let entity = CadEntity::Helix {
            common: common("1"),
            base: Point3::xy(0.0, 0.0),
            radius: 1.0,
            turns: 2.0,
            turn_height: 3.0,
        };
        let converted = convert(&entity, &empty_lookup()).unwrap();
        match converted.geometry.unwrap() {
            Geometry::LineString(pts) => {
                assert_eq!(pts.len(), CURVE_SAMPLES);
                assert!((pts[0].z - 0.0).abs() < 1e-9);
                assert!((pts.last().unwrap().z - 6.0).abs() < 1e-9);
            }
            other => panic!("expected linestring, got {other:?}"),
        }
    }

    #[test]
    fn region_keeps_acis_payload_and_no_geometry() {
        let entity = CadEntity::Region { common: common("1"), acis_data: vec![0xca, 0xfe] };
        let converted = convert(&entity, &empty_lookup()).unwrap();
        assert!(converted.geometry.is_none());
        assert_eq!(converted.geom_type, "REGION");
        assert_eq!(converted.attributes.get("acis_data"), Some(&AttrValue::Blob(vec![0xca, 0xfe])));
    }

    #[test]
    fn degenerate_polyline_is_skipped_not_fatal() {
        let entity = CadEntity::Polyline {
            common: common("1"),
            vertices: vec![Point3::xy(0.0, 0.0)],
            closed: false,
        };
        assert!(convert(&entity, &empty_lookup()).is_none());
    }

    #[test]
    fn closed_two_vertex_polyline_never_yields_a_degenerate_ring() {
        let entity = CadEntity::Polyline {
            common: common("1"),
            vertices: vec![Point3::xy(0.0, 0.0), Point3::xy(1.0, 0.0)],
            closed: true,
        };
        assert!(convert(&entity, &empty_lookup()).is_none());
        // Two vertices are still a fine open linestring.
        let open = CadEntity::Polyline {
            common: common("2"),
            vertices: vec![Point3::xy(0.0, 0.0), Point3::xy(1.0, 0.0)],
            closed: false,
        };
        assert!(convert(&open, &empty_lookup()).is_some());
    }

    #[test]
    fn closed_two_point_spline_is_skipped() {
        let entity = CadEntity::Spline {
            common: common("1"),
            control_points: vec![Point3::xy(0.0, 0.0), Point3::xy(1.0, 1.0)],
            degree: 3,
            closed: true,
        };
        assert!(convert(&entity, &empty_lookup()).is_none());
    }

    #[test]
    fn hatch_with_a_degenerate_loop_is_skipped() {
        let entity = CadEntity::Hatch {
            common: common("1"),
            pattern: "SOLID".into(),
            loops: vec![
                HatchLoop {
                    vertices: vec![Point3::xy(0.0, 0.0), Point3::xy(1.0, 0.0), Point3::xy(1.0, 1.0)],
                },
                HatchLoop { vertices: vec![Point3::xy(0.0, 0.0)] },
            ],
        };
        assert!(convert(&entity, &empty_lookup()).is_none());
    }
}
