use geobounds::{BoundingRegion, Bounds};
use serde::Serialize;
use sqlx::PgConnection;
use tracing::warn;

use crate::{error::AtlasError, quote_ident, table_ref};

/// PostGIS bookkeeping tables, never shown to users.
const SYSTEM_TABLES: [&str; 3] = ["spatial_ref_sys", "geography_columns", "geometry_columns"];
/// Column names treated as spatial even without a PostGIS type.
const SPATIAL_NAMES: [&str; 4] = ["geometry", "geom", "the_geom", "wkb_geometry"];
const TEXT_TYPES: [&str; 4] = ["text", "varchar", "char", "string"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub udt_name: String,
    pub is_nullable: bool,
    pub column_default: Option<String>,
}

impl ColumnInfo {
    pub fn is_spatial(&self) -> bool {
        matches!(self.udt_name.as_str(), "geometry" | "geography")
            || SPATIAL_NAMES.contains(&self.name.to_lowercase().as_str())
    }

    pub fn is_text(&self) -> bool {
        let data_type = self.data_type.to_lowercase();
        TEXT_TYPES.iter().any(|t| data_type.contains(t))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub count: i64,
    pub columns: Vec<String>,
    pub has_spatial: bool,
}

pub fn is_system_table(name: &str) -> bool {
    SYSTEM_TABLES.iter().any(|t| name.starts_with(t))
}

pub fn geometry_column(columns: &[ColumnInfo]) -> Option<&ColumnInfo> {
    columns.iter().find(|c| c.is_spatial())
}

/// Text columns other than `except`, in table order.
pub fn text_columns<'a>(columns: &'a [ColumnInfo], except: Option<&str>) -> Vec<&'a str> {
    columns
        .iter()
        .filter(|c| c.is_text() && Some(c.name.as_str()) != except)
        .map(|c| c.name.as_str())
        .collect()
}

pub async fn list_tables(conn: &mut PgConnection) -> Result<Vec<String>, AtlasError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name::text FROM information_schema.tables
WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
ORDER BY table_name;",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| r.0)
        .filter(|t| !is_system_table(t))
        .collect())
}

/// Columns of `table` in ordinal order; empty when the table does not exist.
pub async fn describe_table(
    conn: &mut PgConnection,
    table: &str,
) -> Result<Vec<ColumnInfo>, AtlasError> {
    let columns = sqlx::query_as(
        "SELECT column_name::text AS name, data_type::text AS data_type, udt_name::text AS udt_name,
(is_nullable = 'YES') AS is_nullable, column_default::text AS column_default
FROM information_schema.columns
WHERE table_schema = 'public' AND table_name = $1
ORDER BY ordinal_position;",
    )
    .bind(table)
    .fetch_all(&mut *conn)
    .await?;
    Ok(columns)
}

/// Like [describe_table] but an unknown table is an error.
pub async fn require_table(
    conn: &mut PgConnection,
    table: &str,
) -> Result<Vec<ColumnInfo>, AtlasError> {
    let columns = describe_table(conn, table).await?;
    if columns.is_empty() {
        return Err(AtlasError::TableNotFound(table.to_owned()));
    }
    Ok(columns)
}

/// Columns of `table` plus the name of its spatial column.
pub async fn require_spatial_table(
    conn: &mut PgConnection,
    table: &str,
) -> Result<(Vec<ColumnInfo>, String), AtlasError> {
    let columns = require_table(conn, table).await?;
    let geom = geometry_column(&columns)
        .map(|c| c.name.clone())
        .ok_or_else(|| AtlasError::NoGeometryColumn(table.to_owned()))?;
    Ok((columns, geom))
}

pub async fn count_rows(conn: &mut PgConnection, table: &str) -> Result<i64, AtlasError> {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {};", table_ref(table)))
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

pub async fn table_info(conn: &mut PgConnection, table: &str) -> Result<TableInfo, AtlasError> {
    let columns = require_table(conn, table).await?;
    let count = count_rows(conn, table).await?;
    Ok(TableInfo {
        name: table.to_owned(),
        count,
        has_spatial: geometry_column(&columns).is_some(),
        columns: columns.into_iter().map(|c| c.name).collect(),
    })
}

/// [TableInfo] for every user table. Tables that fail are logged and left out.
pub async fn table_overview(conn: &mut PgConnection) -> Result<Vec<TableInfo>, AtlasError> {
    let mut infos = Vec::new();
    for table in list_tables(conn).await? {
        match table_info(conn, &table).await {
            Ok(info) => infos.push(info),
            Err(e) => warn!(%table, "skipping table in overview: {e}"),
        }
    }
    Ok(infos)
}

pub(crate) fn extent_region(
    extent: (Option<f64>, Option<f64>, Option<f64>, Option<f64>),
) -> BoundingRegion {
    match extent {
        (Some(min_lon), Some(min_lat), Some(max_lon), Some(max_lat)) => Bounds {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
        .into(),
        _ => BoundingRegion::new(),
    }
}

/// Extent of all non-null geometries in `table`, computed by PostGIS.
pub async fn table_extent(
    conn: &mut PgConnection,
    table: &str,
) -> Result<BoundingRegion, AtlasError> {
    let (_, geom) = require_spatial_table(conn, table).await?;
    let geom = quote_ident(&geom);
    let extent: (Option<f64>, Option<f64>, Option<f64>, Option<f64>) = sqlx::query_as(&format!(
        "SELECT ST_XMin(e), ST_YMin(e), ST_XMax(e), ST_YMax(e)
FROM (SELECT ST_Extent(t.{geom}::geometry) AS e FROM {} AS t WHERE t.{geom} IS NOT NULL) AS s;",
        table_ref(table)
    ))
    .fetch_one(&mut *conn)
    .await?;
    Ok(extent_region(extent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::pool;

    fn column(name: &str, data_type: &str, udt_name: &str) -> ColumnInfo {
        ColumnInfo {
            name: name.into(),
            data_type: data_type.into(),
            udt_name: udt_name.into(),
            is_nullable: true,
            column_default: None,
        }
    }

    #[test]
    fn spatial_detection() {
        assert!(column("shape", "USER-DEFINED", "geometry").is_spatial());
        assert!(column("area", "USER-DEFINED", "geography").is_spatial());
        assert!(column("THE_GEOM", "bytea", "bytea").is_spatial());
        assert!(!column("name", "text", "text").is_spatial());
    }

    #[test]
    fn text_detection() {
        assert!(column("a", "text", "text").is_text());
        assert!(column("b", "character varying", "varchar").is_text());
        assert!(column("c", "character", "bpchar").is_text());
        assert!(!column("d", "integer", "int4").is_text());
        assert!(!column("e", "USER-DEFINED", "geometry").is_text());
    }

    #[test]
    fn picks_first_spatial_column_and_text_columns() {
        let cols = vec![
            column("gid", "integer", "int4"),
            column("NAME", "character varying", "varchar"),
            column("geom", "USER-DEFINED", "geometry"),
            column("LANDTYPE", "text", "text"),
            column("centroid", "USER-DEFINED", "geometry"),
        ];
        assert_eq!(geometry_column(&cols).map(|c| c.name.as_str()), Some("geom"));
        assert_eq!(text_columns(&cols, Some("geom")), ["NAME", "LANDTYPE"]);
        assert_eq!(text_columns(&cols, Some("NAME")), ["LANDTYPE"]);
    }

    #[test]
    fn system_tables_hidden() {
        assert!(is_system_table("spatial_ref_sys"));
        assert!(is_system_table("geometry_columns"));
        assert!(!is_system_table("natural_water"));
    }

    #[test]
    fn extent_needs_all_four_values() {
        assert!(extent_region((None, None, None, None)).is_empty());
        assert!(extent_region((Some(1.0), None, Some(2.0), Some(3.0))).is_empty());
        let b = extent_region((Some(25.2), Some(-22.4), Some(33.1), Some(-15.6)))
            .bounds()
            .expect("complete extent");
        assert_eq!((b.min_lon, b.min_lat, b.max_lon, b.max_lat), (25.2, -22.4, 33.1, -15.6));
    }

    #[async_std::test]
    #[ignore = "requires a PostGIS database"]
    async fn lists_only_user_tables() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.expect("failed to acquire connection");
        let tables = list_tables(&mut conn).await.expect("error listing tables");
        assert!(tables.iter().all(|t| !is_system_table(t)));
    }

    #[async_std::test]
    #[ignore = "requires a PostGIS database"]
    async fn unknown_table_is_reported() {
        let pool = pool().await;
        let mut conn = pool.acquire().await.expect("failed to acquire connection");
        let res = table_extent(&mut conn, "no such table").await;
        assert!(matches!(res, Err(AtlasError::TableNotFound(t)) if t == "no such table"));
    }
}
