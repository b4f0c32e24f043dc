//! Store-side geometry model. Every geometry is 3-D and tagged SRID 4326;
//! it travels to PostGIS as EWKT text bound through ST_GeomFromEWKT.

use crate::entity::Point3;

/// WGS84 geographic CRS; the only SRID this store accepts.
pub const SRID: i32 = 4326;

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point3),
    LineString(Vec<Point3>),
    /// Exterior ring only; rings are closed by construction.
    Polygon(Vec<Point3>),
    MultiPolygon(Vec<Vec<Point3>>),
}

impl Geometry {
    /// Label stored in the geom_type column.
    pub fn geom_type(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "POINT",
            Geometry::LineString(_) => "LINESTRING",
            Geometry::Polygon(_) => "POLYGON",
            Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        }
    }

    /// EWKT rendering, always prefixed with the SRID tag.
    pub fn to_ewkt(&self) -> String {
        match self {
            Geometry::Point(p) => format!("SRID={};POINT Z ({})", SRID, coord(p)),
            Geometry::LineString(pts) => {
                format!("SRID={};LINESTRING Z ({})", SRID, coords(pts))
            }
            Geometry::Polygon(ring) => {
                format!("SRID={};POLYGON Z (({}))", SRID, coords(ring))
            }
            Geometry::MultiPolygon(rings) => {
                let parts: Vec<String> =
                    rings.iter().map(|r| format!("(({}))", coords(r))).collect();
                format!("SRID={};MULTIPOLYGON Z ({})", SRID, parts.join(", "))
            }
        }
    }
}

fn coord(p: &Point3) -> String {
    format!("{} {} {}", p.x, p.y, p.z)
}

fn coords(pts: &[Point3]) -> String {
    pts.iter().map(coord).collect::<Vec<_>>().join(", ")
}

/// Append the first vertex again if the ring does not already end on it.
pub fn close_ring(mut ring: Vec<Point3>) -> Vec<Point3> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
        if first != *last {
            ring.push(first);
        }
    }
    ring
}
