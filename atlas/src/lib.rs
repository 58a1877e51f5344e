use geo_traits::to_geo::ToGeoGeometry;
use geobounds::Geometry;
use sqlx::{
    postgres::{PgPoolOptions, Postgres},
    Pool,
};
use wkb::reader::read_wkb;

pub mod error;
pub use error::*;

pub mod config;
pub use config::*;

pub mod catalog;
pub use catalog::*;

pub mod features;
pub use features::*;

pub mod rows;
pub use rows::*;

pub mod search;
pub use search::*;

pub use sqlx;
pub use sqlx::{PgConnection, PgPool};

pub async fn bind(conn: &str, max_conn: Option<u32>) -> Result<Pool<Postgres>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_conn.unwrap_or(1))
        .connect_lazy(conn)
}

pub async fn connect(config: &DbConfig) -> Result<Pool<Postgres>, sqlx::Error> {
    bind(&config.url, Some(config.max_connections)).await
}

/// Double-quotes an identifier, doubling any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Tables are always looked up in the public schema.
pub(crate) fn table_ref(table: &str) -> String {
    format!("public.{}", quote_ident(table))
}

/// `%` and `_` in user input match literally.
pub fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// `LOWER(CAST(t."col" AS TEXT)) LIKE LOWER($n)` over every column, OR-ed.
/// `None` when there is nothing to search.
pub(crate) fn text_match_clause(columns: &[&str], param: usize) -> Option<String> {
    if columns.is_empty() {
        return None;
    }
    let conditions = columns
        .iter()
        .map(|c| format!("LOWER(CAST(t.{} AS TEXT)) LIKE LOWER(${param})", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(" OR ");
    Some(format!("({conditions})"))
}

pub(crate) fn wkb_to_geometry(bytea: &[u8]) -> Option<Geometry> {
    let geom: geo_types::Geometry<f64> = read_wkb(bytea).ok()?.try_to_geometry()?;
    Some(Geometry::from(geom))
}
