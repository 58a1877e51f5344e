use std::collections::HashMap;

use actix_web::{
    dev::{ServiceFactory, ServiceRequest},
    App, Error,
};

pub mod geojson;
pub mod search;
pub mod tables;

pub fn services<T: ServiceFactory<ServiceRequest, Config = (), Error = Error, InitError = ()>>(
    app: App<T>,
) -> App<T> {
    let app = tables::services(app);
    let app = geojson::services(app);
    search::services(app)
}

/// The trimmed `key` query parameter, `None` when absent or blank.
pub fn query_text<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    geobounds::normalize_filter(query.get(key).map(String::as_str))
}
