use axum::Json;
use axum::extract::State;

use crate::state::{AppState, Connection};

pub async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match state.connection.as_ref() {
        Connection::Connected { .. } => "connected",
        Connection::Failed(_) => "unavailable",
    };
    Json(serde_json::json!({ "status": "ok", "database": database }))
}
