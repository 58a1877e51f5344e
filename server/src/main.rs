use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use atlas::DbConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

mod config;
mod endpoints;
mod error;

/// `RUST_LOG` controls verbosity, defaulting to `info`. actix-web's `log`
/// records are forwarded into the same subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_logging();

    // loads .env before anything else reads the environment
    let db = DbConfig::from_env().map_err(io::Error::other)?;
    let server = ServerConfig::from_env().map_err(io::Error::other)?;

    // connects lazily, so a database outage surfaces per request
    let pool = atlas::connect(&db).await.map_err(io::Error::other)?;
    info!(
        address = server.address.as_str(),
        port = server.port,
        max_connections = db.max_connections,
        "starting server"
    );

    HttpServer::new(move || {
        let app = App::new().app_data(web::Data::new(pool.clone()));
        endpoints::services(app).wrap(Logger::default())
    })
    .bind((server.address.as_str(), server.port))?
    .run()
    .await
}
