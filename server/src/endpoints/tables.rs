use actix_web::{
    dev::{ServiceFactory, ServiceRequest},
    get, web, App, Error, HttpResponse,
};
use atlas::{sample_rows, table_extent, table_overview, PgPool, DEFAULT_ROW_LIMIT};
use serde::Serialize;

use crate::error::ApiError;

pub fn services<T: ServiceFactory<ServiceRequest, Config = (), Error = Error, InitError = ()>>(
    app: App<T>,
) -> App<T> {
    app.service(get_tables)
        .service(get_table_rows)
        .service(get_table_bounds)
}

#[derive(Debug, Serialize)]
pub struct TableBounds {
    pub table: String,
    /// `[min_lon, min_lat, max_lon, max_lat]`, null for a table without
    /// geometries.
    pub bounds: Option<[f64; 4]>,
}

#[get("/api/tables")]
async fn get_tables(pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.acquire().await?;
    Ok(HttpResponse::Ok().json(table_overview(&mut conn).await?))
}

#[get("/api/table/{table}")]
async fn get_table_rows(
    pool: web::Data<PgPool>,
    table: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.acquire().await?;
    Ok(HttpResponse::Ok().json(sample_rows(&mut conn, &table, DEFAULT_ROW_LIMIT).await?))
}

#[get("/api/bounds/{table}")]
async fn get_table_bounds(
    pool: web::Data<PgPool>,
    table: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.acquire().await?;
    let region = table_extent(&mut conn, &table).await?;
    Ok(HttpResponse::Ok().json(TableBounds {
        table: table.into_inner(),
        bounds: region.bounds().map(|b| b.to_bbox()),
    }))
}
