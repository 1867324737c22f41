use geo_types::Coord;

use crate::envelope::Envelope;
use crate::vector::GeometryType;

/// Opaque geometry payload attached to features and spatial filters.
///
/// Encoding, editing and exact spatial predicates belong to the geometry engine. The
/// catalog only looks at a geometry's [type](Geometry::geometry_type) and
/// [extent](Geometry::envelope).
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    geo: geo_types::Geometry<f64>,
}

impl Geometry {
    pub fn from_geo(geo: geo_types::Geometry<f64>) -> Geometry {
        Geometry { geo }
    }

    pub fn point(x: f64, y: f64) -> Geometry {
        Geometry::from_geo(geo_types::Point::new(x, y).into())
    }

    /// Create a rectangular polygon from the given bounds.
    pub fn bbox(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Geometry {
        let rect = geo_types::Rect::new(
            geo_types::coord! { x: min_x, y: min_y },
            geo_types::coord! { x: max_x, y: max_y },
        );
        Geometry::from_geo(rect.to_polygon().into())
    }

    pub fn as_geo(&self) -> &geo_types::Geometry<f64> {
        &self.geo
    }

    pub fn into_geo(self) -> geo_types::Geometry<f64> {
        self.geo
    }

    pub fn geometry_type(&self) -> GeometryType {
        match &self.geo {
            geo_types::Geometry::Point(_) => GeometryType::Point,
            geo_types::Geometry::Line(_) | geo_types::Geometry::LineString(_) => {
                GeometryType::LineString
            }
            geo_types::Geometry::Polygon(_)
            | geo_types::Geometry::Rect(_)
            | geo_types::Geometry::Triangle(_) => GeometryType::Polygon,
            geo_types::Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            geo_types::Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            geo_types::Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            geo_types::Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Bounding box of all coordinates. Empty geometries yield the uninitialized envelope.
    pub fn envelope(&self) -> Envelope {
        self.extent().unwrap_or_default()
    }

    /// `true` when the geometry has no coordinates at all.
    pub fn is_empty(&self) -> bool {
        self.extent().is_none()
    }

    /// Like [`envelope`](Geometry::envelope), but `None` for empty geometries so a
    /// degenerate box at the origin stays distinguishable.
    pub(crate) fn extent(&self) -> Option<Envelope> {
        let mut bounds = Bounds::default();
        bounds.add_geometry(&self.geo);
        bounds
            .extent
            .map(|(min, max)| Envelope::new(min.x, min.y, max.x, max.y))
    }
}

impl From<geo_types::Geometry<f64>> for Geometry {
    fn from(geo: geo_types::Geometry<f64>) -> Self {
        Geometry::from_geo(geo)
    }
}

impl From<Geometry> for geo_types::Geometry<f64> {
    fn from(geometry: Geometry) -> Self {
        geometry.into_geo()
    }
}

/// Running min/max over coordinates. Kept apart from [`Envelope::union`] so that a point at
/// the origin is not mistaken for "no coordinates yet".
#[derive(Default)]
struct Bounds {
    extent: Option<(Coord<f64>, Coord<f64>)>,
}

impl Bounds {
    fn add(&mut self, c: Coord<f64>) {
        self.extent = Some(match self.extent {
            None => (c, c),
            Some((min, max)) => (
                geo_types::coord! { x: min.x.min(c.x), y: min.y.min(c.y) },
                geo_types::coord! { x: max.x.max(c.x), y: max.y.max(c.y) },
            ),
        });
    }

    fn add_line_string(&mut self, line_string: &geo_types::LineString<f64>) {
        for c in line_string.coords() {
            self.add(*c);
        }
    }

    fn add_polygon(&mut self, polygon: &geo_types::Polygon<f64>) {
        // Interior rings lie inside the exterior one.
        self.add_line_string(polygon.exterior());
    }

    fn add_geometry(&mut self, geo: &geo_types::Geometry<f64>) {
        match geo {
            geo_types::Geometry::Point(p) => self.add(p.0),
            geo_types::Geometry::Line(l) => {
                self.add(l.start);
                self.add(l.end);
            }
            geo_types::Geometry::LineString(ls) => self.add_line_string(ls),
            geo_types::Geometry::Polygon(p) => self.add_polygon(p),
            geo_types::Geometry::MultiPoint(mp) => {
                for p in &mp.0 {
                    self.add(p.0);
                }
            }
            geo_types::Geometry::MultiLineString(mls) => {
                for ls in &mls.0 {
                    self.add_line_string(ls);
                }
            }
            geo_types::Geometry::MultiPolygon(mp) => {
                for p in &mp.0 {
                    self.add_polygon(p);
                }
            }
            geo_types::Geometry::GeometryCollection(gc) => {
                for g in &gc.0 {
                    self.add_geometry(g);
                }
            }
            geo_types::Geometry::Rect(r) => {
                self.add(r.min());
                self.add(r.max());
            }
            geo_types::Geometry::Triangle(t) => {
                self.add(t.0);
                self.add(t.1);
                self.add(t.2);
            }
        }
    }
}
