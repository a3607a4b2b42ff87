use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use co2_dashboard::catalog::{collection, relation_query};
use co2_dashboard::{COLLECTIONS, RELATION_QUERIES, SelectionMap, ViewState};
use serde::Deserialize;

use crate::render::{self, Mode, Notice, Page};
use crate::state::AppState;

type PageResponse = (StatusCode, Html<String>);

#[derive(Debug, Default, Deserialize)]
pub struct RelationParams {
    pub query: Option<String>,
    pub item: Option<String>,
    pub run: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionParams {
    pub name: Option<String>,
    pub run: Option<String>,
}

pub async fn index() -> Redirect {
    Redirect::to(Mode::Relations.path())
}

pub async fn relations(
    State(state): State<AppState>,
    Query(params): Query<RelationParams>,
) -> PageResponse {
    if state.ensure_connected().is_err() {
        return halted(&state, Mode::Relations);
    }
    let query = match params.query.as_deref() {
        None => &RELATION_QUERIES[0],
        Some(key) => match relation_query(key) {
            Ok(q) => q,
            Err(e) => return not_found(&state, Mode::Relations, &e.to_string()),
        },
    };

    let dashboard = Arc::clone(&state.dashboard);
    let item = params.item.clone().filter(|_| params.run.is_some());
    let fetched = tokio::task::spawn_blocking(move || {
        let map = dashboard.selection_map(query.source);
        let view = match item {
            Some(label) => ViewState::fetched(|| dashboard.resolve(query, &label)),
            None => Ok(ViewState::Idle),
        };
        (map, view)
    })
    .await;
    let (map, view) = match fetched {
        Ok((map, Ok(view))) => (map, view),
        Ok((_, Err(e))) => return failed(&state, Mode::Relations, &e.to_string()),
        Err(e) => return failed(&state, Mode::Relations, &e.to_string()),
    };

    let sidebar = format!(
        r#"<h3>Relationship queries</h3><form method="get" action="{}">{}<button type="submit">Choose</button></form>"#,
        Mode::Relations.path(),
        render::select(
            "query",
            "Query type:",
            RELATION_QUERIES.iter().map(|q| (q.key, q.title)),
            Some(query.key),
        ),
    );

    let mut main = format!("<h2>Query: {}</h2>", render::escape(query.title));
    if map.is_empty() {
        main.push_str(&render::notice(
            Notice::Warning,
            &format!(
                "Could not load data for entity '{}'. Check that the collection exists and is populated.",
                query.source
            ),
        ));
    } else {
        main.push_str(&item_form(query.key, query.source, &map, params.item.as_deref()));
        main.push_str(&render::view_state(
            &view,
            "No results found for this selection.",
            "Could not fetch results: ",
        ));
    }

    page(&state, Mode::Relations, StatusCode::OK, sidebar, main)
}

fn item_form(query_key: &str, source: &str, map: &SelectionMap, selected: Option<&str>) -> String {
    let selected = selected
        .filter(|label| map.id_for(label).is_some())
        .or_else(|| map.labels().next());

    let mut out = String::new();
    if map.collisions() > 0 {
        out.push_str(&render::notice(
            Notice::Info,
            &format!(
                "{} entries share a display name with another entry and are shown with their identifier.",
                map.collisions()
            ),
        ));
    }
    out.push_str(&format!(
        r#"<form method="get" action="{}"><input type="hidden" name="query" value="{}">{}<button type="submit" name="run" value="1">Fetch data</button></form>"#,
        Mode::Relations.path(),
        render::escape(query_key),
        render::select(
            "item",
            &format!("Select a {source}:"),
            map.labels().map(|l| (l, l)),
            selected,
        ),
    ));
    out
}

pub async fn collections(
    State(state): State<AppState>,
    Query(params): Query<CollectionParams>,
) -> PageResponse {
    if state.ensure_connected().is_err() {
        return halted(&state, Mode::Collections);
    }
    let name = match params.name.as_deref() {
        None => COLLECTIONS[0],
        Some(name) => match collection(name) {
            Ok(name) => name,
            Err(e) => return not_found(&state, Mode::Collections, &e.to_string()),
        },
    };

    let view = if params.run.is_some() {
        let dashboard = Arc::clone(&state.dashboard);
        let fetched =
            tokio::task::spawn_blocking(move || ViewState::fetched(|| dashboard.view_all(name)))
                .await;
        match fetched {
            Ok(Ok(view)) => view,
            Ok(Err(e)) => return failed(&state, Mode::Collections, &e.to_string()),
            Err(e) => return failed(&state, Mode::Collections, &e.to_string()),
        }
    } else {
        ViewState::Idle
    };

    let mut main = String::from("<h2>Full collection view</h2>");
    main.push_str(&format!(
        r#"<form method="get" action="{}">{}<button type="submit" name="run" value="1">Load data</button></form>"#,
        Mode::Collections.path(),
        render::select(
            "name",
            "Collection to view:",
            COLLECTIONS.iter().map(|c| (*c, *c)),
            Some(name),
        ),
    ));
    main.push_str(&render::view_state(
        &view,
        &format!("Collection '{name}' is empty."),
        "Could not load the collection: ",
    ));

    page(&state, Mode::Collections, StatusCode::OK, String::new(), main)
}

fn page(
    state: &AppState,
    mode: Mode,
    status: StatusCode,
    sidebar: String,
    main: String,
) -> PageResponse {
    let html = Page {
        connection: &state.connection,
        mode,
        sidebar,
        main,
    }
    .render();
    (status, Html(html))
}

/// Only the sidebar connection error is rendered.
fn halted(state: &AppState, mode: Mode) -> PageResponse {
    page(
        state,
        mode,
        StatusCode::SERVICE_UNAVAILABLE,
        String::new(),
        String::new(),
    )
}

fn not_found(state: &AppState, mode: Mode, message: &str) -> PageResponse {
    page(
        state,
        mode,
        StatusCode::NOT_FOUND,
        String::new(),
        render::notice(Notice::Error, message),
    )
}

fn failed(state: &AppState, mode: Mode, message: &str) -> PageResponse {
    tracing::error!(error = message, "page fetch task failed");
    page(
        state,
        mode,
        StatusCode::INTERNAL_SERVER_ERROR,
        String::new(),
        render::notice(Notice::Error, message),
    )
}
