#[cfg(test)]
mod tests {
    use geo_types::{Geometry as GeoGeometry, MultiPolygon, coord, polygon};
    use geobounds::*;
    use rand::{seq::SliceRandom, *};

    // Shape of a filtered `/api/geojson/{table}/filtered` response.
    const FILTERED_RESPONSE: &str = r#"{
        "type": "FeatureCollection",
        "filter_applied": true,
        "filter_query": "safari",
        "total_features": 4,
        "features": [
            {"type": "Feature", "id": 1,
             "geometry": {"type": "Polygon", "coordinates": [[[29.0, -16.0], [29.5, -16.0], [29.5, -16.4], [29.0, -16.0]]]},
             "properties": {"NAME": "Sapi Safari Area", "LANDTYPE": "Safari"}},
            {"type": "Feature", "id": 2,
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[30.1, -15.7], [30.3, -15.7], [30.3, -15.9], [30.1, -15.7]]]]},
             "properties": {"NAME": "Chewore Safari Area"}},
            {"type": "Feature", "id": 3,
             "geometry": {"type": "GeometryCollection", "geometries": []},
             "properties": {}},
            {"type": "Feature", "id": 4, "geometry": null, "properties": null}
        ]
    }"#;

    fn random_coordinate() -> Coordinate {
        // quarter degrees survive a JSON round trip exactly
        let quarter = |limit: i32| f64::from(random_range(-limit * 4..=limit * 4)) / 4.0;
        Coordinate::new(quarter(90), quarter(180))
    }

    fn random_geometry() -> Geometry {
        let ring = |n: usize| (0..n).map(|_| random_coordinate()).collect::<Vec<_>>();
        match random_range(0..7) {
            0 => Geometry::Point(random_coordinate()),
            1 => Geometry::MultiPoint(ring(random_range(0..5))),
            2 => Geometry::LineString(ring(random_range(0..5))),
            3 => Geometry::Polygon((0..random_range(0..3)).map(|_| ring(4)).collect()),
            4 => Geometry::MultiLineString((0..random_range(0..3)).map(|_| ring(2)).collect()),
            5 => Geometry::MultiPolygon(
                (0..random_range(0..3))
                    .map(|_| vec![ring(4), ring(3)])
                    .collect(),
            ),
            _ => Geometry::Unrecognized("Curve".into()),
        }
    }

    fn leaves(g: &Geometry) -> Vec<Coordinate> {
        match g {
            Geometry::Point(c) => vec![*c],
            Geometry::MultiPoint(cs) | Geometry::LineString(cs) => cs.clone(),
            Geometry::Polygon(rs) | Geometry::MultiLineString(rs) => rs.concat(),
            Geometry::MultiPolygon(ps) => ps.iter().flat_map(|p| p.concat()).collect(),
            Geometry::Unrecognized(_) => vec![],
        }
    }

    #[test]
    fn backend_response_fits_session() {
        let collection = FeatureCollection::from_json(FILTERED_RESPONSE).expect("valid response");
        assert_eq!(collection.unrecognized_count(), 2);

        let mut session = MapSession::new(Viewport::default());
        let FitOutcome::Fitted(b) = session.load_layer("safari_areas", Some("safari"), collection)
        else {
            panic!("two features have coordinates");
        };
        assert_eq!((b.min_lat, b.max_lat), (-16.4, -15.7));
        assert_eq!((b.min_lon, b.max_lon), (29.0, 30.3));

        let text = session
            .inspect("safari_areas", &FeatureId::from(1))
            .expect("feature 1 is loaded");
        assert_eq!(text, "Type: Polygon\nLANDTYPE: Safari\nNAME: Sapi Safari Area");
        let text = session
            .inspect("safari_areas", &FeatureId::from(3))
            .expect("feature 3 is loaded");
        assert_eq!(text, "Type: GeometryCollection\nNo properties");
        let text = session
            .inspect("safari_areas", &FeatureId::from(4))
            .expect("feature 4 is loaded");
        assert_eq!(text, "Type: None\nNo properties");
    }

    #[test]
    fn traversal_visits_every_leaf() {
        for _ in 0..200 {
            let g = random_geometry();
            let expected: BoundingRegion = leaves(&g).into_iter().collect();
            assert_eq!(g.bounds(), expected, "{g:?}");
        }
    }

    #[test]
    fn feature_order_is_irrelevant() {
        let mut features: Vec<Feature> = (0..300).map(|_| Feature::new(random_geometry())).collect();
        let expected = FeatureCollection::new(features.clone()).bounds();
        features.shuffle(&mut rng());
        assert_eq!(FeatureCollection::new(features.clone()).bounds(), expected);
        assert_eq!(par_bounds(&features), expected);
    }

    #[test]
    fn geojson_round_trip_preserves_bounds() {
        let features: Vec<Feature> = (0..50).map(|_| Feature::new(random_geometry())).collect();
        let collection = FeatureCollection::new(features).with_computed_bbox();
        let text = serde_json::to_string(&collection).expect("serializable");
        let parsed = FeatureCollection::from_json(&text).expect("own output parses");
        assert_eq!(parsed.bounds(), collection.bounds());
        assert_eq!(parsed.bbox, collection.bbox);
    }

    #[test]
    fn geo_types_multipolygon_union() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
        let b = polygon![(x: 40.0, y: -10.0), (x: 42.0, y: -10.0), (x: 42.0, y: -8.0)];
        let g = Geometry::from(GeoGeometry::MultiPolygon(MultiPolygon::new(vec![a, b])));
        let bounds = g.bounds().bounds().expect("non-empty");
        assert_eq!(bounds.to_rect().min(), coord! { x: 0.0, y: -10.0 });
        assert_eq!(bounds.to_rect().max(), coord! { x: 42.0, y: 1.0 });
    }

    #[test]
    fn search_pattern_treats_wildcards_literally() {
        assert_eq!(atlas::like_pattern("100%"), "%100\\%%");
        assert_eq!(atlas::relevance_score(true, 1, 1), 17);
    }
}
