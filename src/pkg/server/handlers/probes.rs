use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{conf::settings, pkg::server::state::AppState, prelude::Result};

pub async fn livez() -> Json<Value> {
    Json(json!({"status": "ok", "service": &settings.service_name}))
}

/// Ready only while the database answers.
pub async fn healthz(State(state): State<AppState>) -> Result<Json<Value>> {
    sqlx::query("SELECT 1").execute(&*state.db_pool).await?;
    tracing::debug!("database reachable");
    Ok(Json(json!({"status": "ok", "database": "up"})))
}
