use geobounds::Properties;
use serde::Serialize;
use sqlx::PgConnection;

use crate::{
    catalog::{geometry_column, require_table},
    error::AtlasError,
    quote_ident, table_ref,
};

pub const DEFAULT_ROW_LIMIT: u32 = 100;

/// A sample of a table's rows, spatial column rendered as GeoJSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRows {
    pub table: String,
    pub columns: Vec<String>,
    pub data: Vec<Properties>,
    pub count: usize,
}

pub(crate) fn rows_query(table: &str, geom: Option<&str>, limit: u32) -> String {
    let row = match geom {
        Some(geom) => format!(
            "((to_jsonb(t) - $1::text) || jsonb_build_object($1::text, ST_AsGeoJSON(t.{}::geometry)::jsonb))",
            quote_ident(geom)
        ),
        None => "to_jsonb(t)".into(),
    };
    format!("SELECT {row}::text FROM {} AS t LIMIT {limit};", table_ref(table))
}

pub async fn sample_rows(
    conn: &mut PgConnection,
    table: &str,
    limit: u32,
) -> Result<TableRows, AtlasError> {
    let columns = require_table(conn, table).await?;
    let geom = geometry_column(&columns).map(|c| c.name.as_str());

    let query = rows_query(table, geom, limit);
    let mut query = sqlx::query_as::<_, (String,)>(&query);
    if let Some(geom) = geom {
        query = query.bind(geom);
    }
    let rows = query.fetch_all(&mut *conn).await?;

    let data = rows
        .into_iter()
        .map(|(text,)| serde_json::from_str::<Properties>(&text))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(TableRows {
        table: table.to_owned(),
        columns: columns.into_iter().map(|c| c.name).collect(),
        count: data.len(),
        data,
    })
}
