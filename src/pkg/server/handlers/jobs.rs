use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use validator::Validate;

use super::paginated;
use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{
                mutators::JobMutator,
                selectors::JobSelector,
                spec::{ADMIN_FILTERS, JobInput},
            },
            auth::AdminClaims,
            listing::{PageRequest, Predicate},
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let predicate = Predicate::build(ADMIN_FILTERS, &params)?;
    let page = JobSelector::new(&*state.db_pool)
        .list(&predicate, PageRequest::from_params(&params))
        .await?;
    paginated("jobs", page)
}

pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<Arc<AdminClaims>>,
    Json(input): Json<JobInput>,
) -> Result<(StatusCode, Json<Value>)> {
    input.validate()?;
    let job = JobMutator::new(&*state.db_pool).create(&input).await?;
    tracing::info!("admin {} created job {}", admin.sub, job.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "message": "Job created", "job": job})),
    ))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let job = JobSelector::new(&*state.db_pool)
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Job"))?;
    Ok(Json(json!({"success": true, "job": job})))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<JobInput>,
) -> Result<Json<Value>> {
    input.validate()?;
    let job = JobMutator::new(&*state.db_pool)
        .update(id, &input)
        .await?
        .ok_or(AppError::NotFound("Job"))?;
    Ok(Json(json!({"success": true, "message": "Job updated", "job": job})))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<Arc<AdminClaims>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    if !JobMutator::new(&*state.db_pool).delete(id).await? {
        return Err(AppError::NotFound("Job"));
    }
    tracing::info!("admin {} deleted job {}", admin.sub, id);
    Ok(Json(json!({"success": true, "message": "Job deleted"})))
}
