use rayon::prelude::*;
use tracing::debug;

use crate::{BoundingRegion, Coordinate, Feature, Geometry};

/// Folds every leaf coordinate of `geometry` into `region`.
///
/// Unrecognized geometries contribute nothing; empty sequences at any level
/// are likewise a no-op.
pub fn accumulate(geometry: &Geometry, region: &mut BoundingRegion) {
    match geometry {
        Geometry::Point(c) => region.fold(*c),
        Geometry::MultiPoint(cs) | Geometry::LineString(cs) => fold_all(cs, region),
        Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
            rings.iter().for_each(|ring| fold_all(ring, region))
        }
        Geometry::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .for_each(|ring| fold_all(ring, region)),
        Geometry::Unrecognized(kind) => {
            debug!(kind = kind.as_str(), "skipping unrecognized geometry")
        }
    }
}

fn fold_all(coords: &[Coordinate], region: &mut BoundingRegion) {
    coords.iter().for_each(|c| region.fold(*c));
}

/// Accumulates every feature's geometry. Absent geometries are skipped.
pub fn accumulate_features<'a, I>(features: I, region: &mut BoundingRegion)
where
    I: IntoIterator<Item = &'a Feature>,
{
    features
        .into_iter()
        .filter_map(|f| f.geometry.as_ref())
        .for_each(|g| accumulate(g, region));
}

/// Same result as [accumulate_features], computed with per-worker partial
/// regions merged at the end.
pub fn par_bounds(features: &[Feature]) -> BoundingRegion {
    features
        .par_iter()
        .map(Feature::bounds)
        .reduce(BoundingRegion::new, BoundingRegion::merge)
}

impl Geometry {
    pub fn bounds(&self) -> BoundingRegion {
        let mut region = BoundingRegion::new();
        accumulate(self, &mut region);
        region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn bounds(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Option<Bounds> {
        Some(Bounds {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    fn square(lat: f64, lon: f64, size: f64) -> Vec<Coordinate> {
        vec![
            c(lat, lon),
            c(lat, lon + size),
            c(lat + size, lon + size),
            c(lat + size, lon),
        ]
    }

    #[test]
    fn point() {
        let g = Geometry::Point(c(10.0, 20.0));
        assert_eq!(g.bounds().bounds(), bounds(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn polygon_ring() {
        let g = Geometry::Polygon(vec![vec![c(0.0, 0.0), c(0.0, 5.0), c(5.0, 5.0), c(5.0, 0.0)]]);
        assert_eq!(g.bounds().bounds(), bounds(0.0, 5.0, 0.0, 5.0));
    }

    #[test]
    fn multipolygon_is_union_of_parts() {
        let g = Geometry::MultiPolygon(vec![
            vec![square(0.0, 0.0, 1.0)],
            vec![square(10.0, -30.0, 2.0), vec![]],
        ]);
        assert_eq!(g.bounds().bounds(), bounds(0.0, 12.0, -30.0, 1.0));
    }

    #[test]
    fn line_and_multiline() {
        let line = Geometry::LineString(vec![c(1.0, 1.0), c(-1.0, 4.0)]);
        let multi = Geometry::MultiLineString(vec![vec![c(1.0, 1.0)], vec![c(-1.0, 4.0)]]);
        assert_eq!(line.bounds(), multi.bounds());
        assert_eq!(line.bounds().bounds(), bounds(-1.0, 1.0, 1.0, 4.0));
    }

    #[test]
    fn empty_shapes_leave_region_empty() {
        for g in [
            Geometry::MultiPoint(vec![]),
            Geometry::LineString(vec![]),
            Geometry::Polygon(vec![vec![], vec![]]),
            Geometry::MultiLineString(vec![]),
            Geometry::MultiPolygon(vec![vec![vec![]]]),
        ] {
            assert!(g.bounds().is_empty(), "{} should add nothing", g.kind());
        }
    }

    #[test]
    fn no_features_leave_region_empty() {
        let mut region = BoundingRegion::new();
        accumulate_features(&[], &mut region);
        assert!(region.is_empty());
        assert!(par_bounds(&[]).is_empty());
    }

    #[test]
    fn unrecognized_sibling_does_not_block_others() {
        let features = vec![
            Feature::new(Geometry::Point(c(3.0, 4.0))),
            Feature::new(Geometry::Unrecognized("Circle".into())),
            Feature::default(),
            Feature::new(Geometry::MultiPoint(vec![c(-3.0, 9.0)])),
        ];
        let mut region = BoundingRegion::new();
        accumulate_features(&features, &mut region);
        assert_eq!(region.bounds(), bounds(-3.0, 3.0, 4.0, 9.0));
    }

    #[test]
    fn region_threads_through_many_calls() {
        let mut region = BoundingRegion::new();
        accumulate(&Geometry::Point(c(1.0, 1.0)), &mut region);
        accumulate(&Geometry::LineString(vec![c(2.0, -2.0)]), &mut region);
        assert_eq!(region.bounds(), bounds(1.0, 2.0, -2.0, 1.0));
    }

    #[test]
    fn parallel_matches_sequential() {
        let features: Vec<Feature> = (0..500)
            .map(|i| {
                let lat = ((i * 7) % 170) as f64 - 85.0;
                let lon = ((i * 13) % 350) as f64 - 175.0;
                Feature::new(Geometry::Polygon(vec![square(lat, lon, 0.5)]))
            })
            .collect();
        let mut sequential = BoundingRegion::new();
        accumulate_features(&features, &mut sequential);
        assert_eq!(par_bounds(&features), sequential);
    }
}
