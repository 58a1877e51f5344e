use derive_more::Into;
use geobounds::{normalize_filter, Feature, FeatureCollection, FeatureId, FeatureSource, Properties};
use sqlx::{postgres::PgRow, FromRow, PgConnection, Pool, Postgres, Row};
use tracing::{debug, warn};

use crate::{
    catalog::{require_spatial_table, text_columns},
    error::AtlasError,
    like_pattern, quote_ident, table_ref, text_match_clause, wkb_to_geometry,
};

pub const DEFAULT_FEATURE_LIMIT: u32 = 1000;

#[derive(Into)]
struct FeatureRow(Feature);

impl FromRow<'_, PgRow> for FeatureRow {
    fn from_row(row: &'_ PgRow) -> Result<Self, sqlx::Error> {
        let fid = row.try_get::<i64, _>("fid")?;
        let geometry = row
            .try_get::<Option<Vec<u8>>, _>("geom")?
            .and_then(|bytes| {
                let geometry = wkb_to_geometry(&bytes);
                if geometry.is_none() {
                    warn!(fid, "could not decode feature geometry");
                }
                geometry
            });
        let properties = match row.try_get::<Option<String>, _>("properties")? {
            Some(text) => serde_json::from_str::<Properties>(&text).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "properties".into(),
                    source: Box::new(e),
                }
            })?,
            None => Properties::new(),
        };
        Ok(FeatureRow(Feature {
            id: Some(FeatureId::Number(fid.into())),
            geometry,
            properties,
        }))
    }
}

/// Builds the feature select. `$1` is the geometry column name (stripped
/// from the properties) and `$2`, when a text clause is given, the filter
/// pattern.
pub(crate) fn feature_query(
    table: &str,
    geom: &str,
    text_clause: Option<&str>,
    limit: u32,
) -> String {
    let g = quote_ident(geom);
    let filter = text_clause.map_or_else(String::new, |c| format!(" AND {c}"));
    format!(
        "SELECT row_number() OVER () AS fid, st_asbinary(t.{g}::geometry,'NDR') AS geom,
(to_jsonb(t) - $1::text)::text AS properties
FROM {} AS t
WHERE t.{g} IS NOT NULL{filter}
LIMIT {limit};",
        table_ref(table)
    )
}

/// Features of `table`, narrowed by a case-insensitive substring `filter`
/// over its text columns.
///
/// A filter on a table without text columns matches nothing.
pub async fn fetch_features(
    conn: &mut PgConnection,
    table: &str,
    filter: Option<&str>,
    limit: u32,
) -> Result<FeatureCollection, AtlasError> {
    let (columns, geom) = require_spatial_table(conn, table).await?;

    let rows: Vec<FeatureRow> = match normalize_filter(filter) {
        None => {
            sqlx::query_as(&feature_query(table, &geom, None, limit))
                .bind(&geom)
                .fetch_all(&mut *conn)
                .await?
        }
        Some(needle) => {
            let searchable = text_columns(&columns, Some(&geom));
            let Some(clause) = text_match_clause(&searchable, 2) else {
                debug!(table, "filter on table without text columns");
                return Ok(FeatureCollection::default());
            };
            sqlx::query_as(&feature_query(table, &geom, Some(&clause), limit))
                .bind(&geom)
                .bind(like_pattern(needle))
                .fetch_all(&mut *conn)
                .await?
        }
    };

    Ok(rows.into_iter().map(Feature::from).collect())
}

/// [FeatureSource] over a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgFeatureSource {
    pool: Pool<Postgres>,
    limit: u32,
}

impl PgFeatureSource {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            limit: DEFAULT_FEATURE_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

impl FeatureSource for PgFeatureSource {
    type Error = AtlasError;

    async fn fetch(
        &self,
        table: &str,
        filter: Option<&str>,
    ) -> Result<FeatureCollection, AtlasError> {
        let mut conn = self.pool.acquire().await?;
        fetch_features(&mut conn, table, filter, self.limit).await
    }
}
