use std::collections::HashMap;

use actix_web::{
    dev::{ServiceFactory, ServiceRequest},
    get, web, App, Error, HttpResponse,
};
use atlas::{fetch_features, PgPool, DEFAULT_FEATURE_LIMIT};
use geobounds::{Feature, FeatureCollection};
use serde::Serialize;

use super::query_text;
use crate::error::ApiError;

pub fn services<T: ServiceFactory<ServiceRequest, Config = (), Error = Error, InitError = ()>>(
    app: App<T>,
) -> App<T> {
    app.service(get_geojson).service(get_geojson_filtered)
}

/// A feature collection annotated with the filter that produced it.
#[derive(Debug, Serialize)]
pub struct FilteredCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bbox: Option<[f64; 4]>,
    features: Vec<Feature>,
    filter_applied: bool,
    filter_query: String,
    total_features: usize,
}

impl FilteredCollection {
    pub fn new(collection: FeatureCollection, filter_query: &str) -> Self {
        let collection = collection.with_computed_bbox();
        Self {
            kind: "FeatureCollection",
            bbox: collection.bbox,
            total_features: collection.len(),
            features: collection.features,
            filter_applied: true,
            filter_query: filter_query.to_owned(),
        }
    }
}

async fn load(pool: &PgPool, table: &str, filter: Option<&str>) -> Result<FeatureCollection, ApiError> {
    let mut conn = pool.acquire().await?;
    Ok(fetch_features(&mut conn, table, filter, DEFAULT_FEATURE_LIMIT).await?)
}

// http://127.0.0.1:5000/api/geojson/natural_water
#[get("/api/geojson/{table}")]
async fn get_geojson(
    pool: web::Data<PgPool>,
    table: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let collection = load(&pool, &table, None).await?;
    Ok(HttpResponse::Ok().json(collection.with_computed_bbox()))
}

// http://127.0.0.1:5000/api/geojson/natural_water/filtered?q=zambezi
#[get("/api/geojson/{table}/filtered")]
async fn get_geojson_filtered(
    pool: web::Data<PgPool>,
    table: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let Some(filter) = query_text(&query, "q") else {
        let collection = load(&pool, &table, None).await?;
        return Ok(HttpResponse::Ok().json(collection.with_computed_bbox()));
    };
    let collection = load(&pool, &table, Some(filter)).await?;
    Ok(HttpResponse::Ok().json(FilteredCollection::new(collection, filter)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobounds::{Coordinate, Geometry};
    use serde_json::json;

    #[test]
    fn filtered_collection_carries_filter_metadata() {
        let collection = FeatureCollection::new(vec![
            Feature::new(Geometry::Point(Coordinate::new(-16.5, 29.0))).with_id(1),
            Feature::new(Geometry::Point(Coordinate::new(-17.5, 30.0))).with_id(2),
        ]);
        let value = serde_json::to_value(FilteredCollection::new(collection, "sapi"))
            .expect("serializable");
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["bbox"], json!([29.0, -17.5, 30.0, -16.5]));
        assert_eq!(value["filter_applied"], true);
        assert_eq!(value["filter_query"], "sapi");
        assert_eq!(value["total_features"], 2);
        assert_eq!(value["features"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn empty_filtered_collection_has_no_bbox() {
        let value = serde_json::to_value(FilteredCollection::new(FeatureCollection::default(), "x"))
            .expect("serializable");
        assert!(value.get("bbox").is_none());
        assert_eq!(value["total_features"], 0);
        assert_eq!(value["features"], json!([]));
    }
}
