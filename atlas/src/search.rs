use std::collections::BTreeMap;

use geobounds::Properties;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgConnection;
use tracing::{debug, warn};

use crate::{
    catalog::{describe_table, geometry_column, list_tables, text_columns},
    error::AtlasError,
    like_pattern, table_ref, text_match_clause,
};

pub const MAX_SEARCH_RESULTS: usize = 20;
const SAMPLE_MATCHES: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataMatch {
    pub record_id: Value,
    pub matching_fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub table_name: String,
    pub table_match: bool,
    pub column_matches: Vec<String>,
    pub data_matches: Vec<DataMatch>,
    pub total_data_matches: i64,
    pub has_spatial: bool,
    pub total_columns: usize,
    pub relevance_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchResult>,
}

pub fn relevance_score(table_match: bool, column_matches: usize, data_matches: usize) -> u32 {
    let table: u32 = if table_match { 10 } else { 0 };
    let columns = u32::try_from(column_matches).unwrap_or(u32::MAX);
    let data = u32::try_from(data_matches.min(10)).unwrap_or(10);
    table
        .saturating_add(columns.saturating_mul(5))
        .saturating_add(data * 2)
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// The searched columns of `record` whose value contains the query.
pub fn matching_fields(
    record: &Properties,
    columns: &[&str],
    needle_lower: &str,
) -> BTreeMap<String, String> {
    columns
        .iter()
        .filter_map(|col| {
            let value = display_value(record.get(*col)?)?;
            contains_ci(&value, needle_lower).then(|| (col.to_string(), value))
        })
        .collect()
}

/// Sorts by descending score, keeping table order among equals, and caps
/// the list.
pub fn rank(mut results: Vec<SearchResult>) -> Vec<SearchResult> {
    results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    results.truncate(MAX_SEARCH_RESULTS);
    results
}

/// Searches table names, column names and text values for `query`.
pub async fn search(conn: &mut PgConnection, query: &str) -> Result<SearchResponse, AtlasError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchResponse {
            query: String::new(),
            total_results: 0,
            results: Vec::new(),
        });
    }

    let mut results = Vec::new();
    for table in list_tables(conn).await? {
        match search_table(conn, &table, query).await {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(e) => warn!(%table, "skipping table in search: {e}"),
        }
    }

    debug!(query, hits = results.len(), "search finished");
    Ok(SearchResponse {
        query: query.to_owned(),
        total_results: results.len(),
        results: rank(results),
    })
}

async fn search_table(
    conn: &mut PgConnection,
    table: &str,
    query: &str,
) -> Result<Option<SearchResult>, AtlasError> {
    let needle = query.to_lowercase();
    let columns = describe_table(conn, table).await?;

    let table_match = contains_ci(table, &needle);
    let column_matches: Vec<String> = columns
        .iter()
        .filter(|c| contains_ci(&c.name, &needle))
        .map(|c| c.name.clone())
        .collect();

    let searchable = text_columns(&columns, None);
    let mut total_data_matches = 0;
    let mut data_matches = Vec::new();

    if let Some(clause) = text_match_clause(&searchable, 1) {
        let pattern = like_pattern(query);
        let (count,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM {} AS t WHERE {clause};",
            table_ref(table)
        ))
        .bind(&pattern)
        .fetch_one(&mut *conn)
        .await?;
        total_data_matches = count;

        if count > 0 {
            let samples: Vec<(String,)> = sqlx::query_as(&format!(
                "SELECT to_jsonb(t)::text FROM {} AS t WHERE {clause} LIMIT {SAMPLE_MATCHES};",
                table_ref(table)
            ))
            .bind(&pattern)
            .fetch_all(&mut *conn)
            .await?;

            for (text,) in samples {
                let record: Properties =
                    serde_json::from_str(&text).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
                let matching = matching_fields(&record, &searchable, &needle);
                if !matching.is_empty() {
                    data_matches.push(DataMatch {
                        record_id: record.get("id").cloned().unwrap_or_else(|| "N/A".into()),
                        matching_fields: matching,
                    });
                }
            }
        }
    }

    if !table_match && column_matches.is_empty() && data_matches.is_empty() {
        return Ok(None);
    }

    Ok(Some(SearchResult {
        table_name: table.to_owned(),
        relevance_score: relevance_score(table_match, column_matches.len(), data_matches.len()),
        table_match,
        column_matches,
        data_matches,
        total_data_matches,
        has_spatial: geometry_column(&columns).is_some(),
        total_columns: columns.len(),
    }))
}
