use geo_types::{Rect, coord};

use crate::Coordinate;

/// Concrete box of a non-empty [BoundingRegion].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn of(c: Coordinate) -> Self {
        Self {
            min_lat: c.lat,
            max_lat: c.lat,
            min_lon: c.lon,
            max_lon: c.lon,
        }
    }

    pub fn extend(&mut self, c: Coordinate) {
        self.min_lat = self.min_lat.min(c.lat);
        self.max_lat = self.max_lat.max(c.lat);
        self.min_lon = self.min_lon.min(c.lon);
        self.max_lon = self.max_lon.max(c.lon);
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Grows every side by `ratio` of the box's extent on that axis.
    pub fn pad(self, ratio: f64) -> Bounds {
        let dlat = (self.max_lat - self.min_lat) * ratio;
        let dlon = (self.max_lon - self.min_lon) * ratio;
        Bounds {
            min_lat: self.min_lat - dlat,
            max_lat: self.max_lat + dlat,
            min_lon: self.min_lon - dlon,
            max_lon: self.max_lon + dlon,
        }
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&c.lat)
            && (self.min_lon..=self.max_lon).contains(&c.lon)
    }

    /// GeoJSON `bbox` member order: `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn to_bbox(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(value: Rect<f64>) -> Self {
        Bounds {
            min_lat: value.min().y,
            max_lat: value.max().y,
            min_lon: value.min().x,
            max_lon: value.max().x,
        }
    }
}

/// Running lat/lon extent. Starts empty; the first fold initializes it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingRegion {
    bounds: Option<Bounds>,
}

impl BoundingRegion {
    pub const fn new() -> Self {
        Self { bounds: None }
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// `None` until at least one coordinate has been folded in.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn fold(&mut self, c: Coordinate) {
        self.bounds = Some(match self.bounds {
            Some(mut b) => {
                b.extend(c);
                b
            }
            None => Bounds::of(c),
        });
    }

    /// Associative, commutative combine; the empty region is the identity.
    pub fn merge(self, other: BoundingRegion) -> BoundingRegion {
        let bounds = match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };
        BoundingRegion { bounds }
    }
}

impl From<Bounds> for BoundingRegion {
    fn from(value: Bounds) -> Self {
        Self {
            bounds: Some(value),
        }
    }
}

impl From<Option<Bounds>> for BoundingRegion {
    fn from(bounds: Option<Bounds>) -> Self {
        Self { bounds }
    }
}

impl Extend<Coordinate> for BoundingRegion {
    fn extend<I: IntoIterator<Item = Coordinate>>(&mut self, iter: I) {
        iter.into_iter().for_each(|c| self.fold(c));
    }
}

impl FromIterator<Coordinate> for BoundingRegion {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let mut region = BoundingRegion::new();
        region.extend(iter);
        region
    }
}
