use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use super::paginated;
use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{selectors::JobSelector, spec::CAREERS_FILTERS},
            listing::{PageRequest, Predicate},
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

/// Open postings for the public careers page.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let predicate = Predicate::build(CAREERS_FILTERS, &params)?;
    let page = JobSelector::new(&*state.db_pool)
        .list_open(predicate, PageRequest::from_params(&params))
        .await?;
    paginated("jobs", page)
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let job = JobSelector::new(&*state.db_pool)
        .get_active(id)
        .await?
        .ok_or(AppError::NotFound("Job"))?;
    Ok(Json(json!({"success": true, "job": job})))
}
