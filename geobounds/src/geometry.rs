use geo_types::{Coord, Geometry as GeoGeometry, LineString};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use serde_json::Value;

/// A position read from input. Written to GeoJSON as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(value: Coord<f64>) -> Self {
        Self::new(value.y, value.x)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Coord {
            x: value.lon,
            y: value.lat,
        }
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.lon, self.lat).serialize(serializer)
    }
}

pub type Ring = Vec<Coordinate>;

/// Closed set of geometry shapes the bounds traversal understands.
///
/// `Unrecognized` carries the tag of anything else: an unknown GeoJSON type,
/// a `geo_types` shape without a GeoJSON counterpart, or a known type whose
/// coordinates could not be read at all.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Geometry {
    Point(Coordinate),
    MultiPoint(Vec<Coordinate>),
    LineString(Vec<Coordinate>),
    Polygon(Vec<Ring>),
    MultiLineString(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    Unrecognized(String),
}

impl Geometry {
    /// The GeoJSON `type` tag.
    pub fn kind(&self) -> &str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::Unrecognized(kind) => kind,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Geometry::Unrecognized(_))
    }
}

// Any JSON value is accepted; whatever cannot be read becomes `Unrecognized`.
impl From<Value> for Geometry {
    fn from(value: Value) -> Self {
        let (kind, coordinates) = match value {
            Value::Object(mut map) => {
                let kind = match map.remove("type") {
                    Some(Value::String(kind)) => kind,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                (kind, map.remove("coordinates").unwrap_or_default())
            }
            _ => (String::new(), Value::Null),
        };
        let coords = &coordinates;
        match kind.as_str() {
            "Point" => match position(coords) {
                Some(c) => Geometry::Point(c),
                None => Geometry::Unrecognized(kind),
            },
            "MultiPoint" => Geometry::MultiPoint(positions(coords)),
            "LineString" => Geometry::LineString(positions(coords)),
            "Polygon" => Geometry::Polygon(rings(coords)),
            "MultiLineString" => Geometry::MultiLineString(rings(coords)),
            "MultiPolygon" => Geometry::MultiPolygon(children(coords).map(rings).collect()),
            _ => Geometry::Unrecognized(kind),
        }
    }
}

fn children(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

// Malformed positions are dropped rather than failing the whole geometry.
fn position(value: &Value) -> Option<Coordinate> {
    match value.as_array()?.as_slice() {
        [lon, lat, ..] => Some(Coordinate::new(lat.as_f64()?, lon.as_f64()?)),
        _ => None,
    }
}

fn positions(value: &Value) -> Vec<Coordinate> {
    children(value).filter_map(position).collect()
}

fn rings(value: &Value) -> Vec<Ring> {
    children(value).map(positions).collect()
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let recognized = self.is_recognized();
        let mut map = serializer.serialize_map(Some(if recognized { 2 } else { 1 }))?;
        map.serialize_entry("type", self.kind())?;
        match self {
            Geometry::Point(c) => map.serialize_entry("coordinates", c)?,
            Geometry::MultiPoint(cs) | Geometry::LineString(cs) => {
                map.serialize_entry("coordinates", cs)?
            }
            Geometry::Polygon(rs) | Geometry::MultiLineString(rs) => {
                map.serialize_entry("coordinates", rs)?
            }
            Geometry::MultiPolygon(ps) => map.serialize_entry("coordinates", ps)?,
            Geometry::Unrecognized(_) => {}
        }
        map.end()
    }
}

fn ring(ls: &LineString<f64>) -> Ring {
    ls.coords().copied().map(Coordinate::from).collect()
}

fn polygon_rings(polygon: &geo_types::Polygon<f64>) -> Vec<Ring> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring)
        .collect()
}

impl From<&GeoGeometry<f64>> for Geometry {
    fn from(value: &GeoGeometry<f64>) -> Self {
        match value {
            GeoGeometry::Point(p) => Geometry::Point(p.0.into()),
            GeoGeometry::MultiPoint(mp) => {
                Geometry::MultiPoint(mp.iter().map(|p| p.0.into()).collect())
            }
            GeoGeometry::LineString(ls) => Geometry::LineString(ring(ls)),
            GeoGeometry::Polygon(p) => Geometry::Polygon(polygon_rings(p)),
            GeoGeometry::MultiLineString(mls) => {
                Geometry::MultiLineString(mls.iter().map(ring).collect())
            }
            GeoGeometry::MultiPolygon(mp) => {
                Geometry::MultiPolygon(mp.iter().map(polygon_rings).collect())
            }
            GeoGeometry::Line(_) => Geometry::Unrecognized("Line".into()),
            GeoGeometry::Rect(_) => Geometry::Unrecognized("Rect".into()),
            GeoGeometry::Triangle(_) => Geometry::Unrecognized("Triangle".into()),
            GeoGeometry::GeometryCollection(_) => {
                Geometry::Unrecognized("GeometryCollection".into())
            }
        }
    }
}

impl From<GeoGeometry<f64>> for Geometry {
    fn from(value: GeoGeometry<f64>) -> Self {
        Self::from(&value)
    }
}
