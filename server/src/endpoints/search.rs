use std::collections::HashMap;

use actix_web::{
    dev::{ServiceFactory, ServiceRequest},
    get, web, App, Error, HttpResponse,
};
use atlas::{search, PgPool};

use super::query_text;
use crate::error::ApiError;

pub fn services<T: ServiceFactory<ServiceRequest, Config = (), Error = Error, InitError = ()>>(
    app: App<T>,
) -> App<T> {
    app.service(get_search)
}

// http://127.0.0.1:5000/api/search?q=sapi
#[get("/api/search")]
async fn get_search(
    pool: web::Data<PgPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let Some(q) = query_text(&query, "q") else {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "results": [] })));
    };
    let mut conn = pool.acquire().await?;
    Ok(HttpResponse::Ok().json(search(&mut conn, q).await?))
}
