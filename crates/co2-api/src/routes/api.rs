use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use co2_client::codec::bson_to_json;
use co2_dashboard::catalog::{collection, relation_query};
use co2_dashboard::{COLLECTIONS, RELATION_QUERIES, RelationQuery, Resolution, SelectionMap, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QueryInfo {
    pub key: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    pub target: &'static str,
    pub filter_field: &'static str,
}

impl From<&RelationQuery> for QueryInfo {
    fn from(q: &RelationQuery) -> Self {
        Self {
            key: q.key,
            title: q.title,
            source: q.source,
            target: q.target,
            filter_field: q.filter_field,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OptionEntry {
    pub label: String,
    pub id: Value,
}

#[derive(Debug, Serialize)]
pub struct OptionsBody {
    pub collection: String,
    pub display_field: String,
    pub collisions: usize,
    pub options: Vec<OptionEntry>,
}

impl From<&SelectionMap> for OptionsBody {
    fn from(map: &SelectionMap) -> Self {
        Self {
            collection: map.collection().to_string(),
            display_field: map.display_field().to_string(),
            collisions: map.collisions(),
            options: map
                .items()
                .iter()
                .map(|item| OptionEntry {
                    label: item.label.clone(),
                    id: bson_to_json(&item.id),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TableBody {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl From<&Table> for TableBody {
    fn from(table: &Table) -> Self {
        Self {
            columns: table.columns().to_vec(),
            rows: table
                .rows()
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.as_ref().map_or(Value::Null, bson_to_json))
                        .collect()
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResolutionBody {
    Displaying { table: TableBody },
    Empty { message: String },
    Error { message: String },
}

impl ResolutionBody {
    fn new(resolution: Resolution, empty_message: String) -> Self {
        match resolution {
            Resolution::Rows(rows) => ResolutionBody::Displaying {
                table: TableBody::from(&Table::from_documents(&rows)),
            },
            Resolution::Empty => ResolutionBody::Empty {
                message: empty_message,
            },
            Resolution::Failed(message) => ResolutionBody::Error { message },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemParams {
    pub item: String,
}

pub async fn list_queries() -> Json<Vec<QueryInfo>> {
    Json(RELATION_QUERIES.iter().map(QueryInfo::from).collect())
}

pub async fn list_collections() -> Json<Vec<&'static str>> {
    Json(COLLECTIONS.to_vec())
}

pub async fn query_options(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<OptionsBody>, ApiError> {
    state.ensure_connected()?;
    let query = relation_query(&key)?;
    let dashboard = Arc::clone(&state.dashboard);
    let map = tokio::task::spawn_blocking(move || dashboard.selection_map(query.source)).await?;
    Ok(Json(OptionsBody::from(&map)))
}

pub async fn query_results(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<ItemParams>,
) -> Result<Json<ResolutionBody>, ApiError> {
    state.ensure_connected()?;
    let query = relation_query(&key)?;
    let dashboard = Arc::clone(&state.dashboard);
    let resolution =
        tokio::task::spawn_blocking(move || dashboard.resolve(query, &params.item)).await?;
    Ok(Json(ResolutionBody::new(
        resolution,
        "No results found for this selection.".into(),
    )))
}

pub async fn view_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ResolutionBody>, ApiError> {
    state.ensure_connected()?;
    let name = collection(&name)?;
    let dashboard = Arc::clone(&state.dashboard);
    let resolution = tokio::task::spawn_blocking(move || dashboard.view_all(name)).await?;
    Ok(Json(ResolutionBody::new(
        resolution,
        format!("Collection '{name}' is empty."),
    )))
}

pub async fn invalidate_cache(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.ensure_connected()?;
    state.dashboard.invalidate_selections();
    tracing::info!("selection cache cleared");
    Ok(StatusCode::NO_CONTENT)
}
