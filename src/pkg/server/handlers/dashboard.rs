use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    pkg::{internal::adaptors::dashboard::DashboardSelector, server::state::AppState},
    prelude::Result,
};

pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>> {
    let stats = DashboardSelector::new(&*state.db_pool).stats().await?;
    Ok(Json(json!({"success": true, "stats": stats})))
}
