use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use validator::Validate;

use super::{StatusInput, paginated, require_status};
use crate::{
    pkg::{
        internal::{
            adaptors::contacts::{
                mutators::ContactMutator,
                selectors::ContactSelector,
                spec::{CONTACT_STATUSES, ContactInput, FILTERS},
            },
            listing::{PageRequest, Predicate},
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> Result<(StatusCode, Json<Value>)> {
    input.validate()?;
    let contact = ContactMutator::new(&*state.db_pool).create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Thank you for your message. We will get back to you soon.",
            "id": contact.id,
        })),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let predicate = Predicate::build(FILTERS, &params)?;
    let page = ContactSelector::new(&*state.db_pool)
        .list(&predicate, PageRequest::from_params(&params))
        .await?;
    paginated("contacts", page)
}

/// Opening a message marks it read.
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    if ContactMutator::new(&*state.db_pool).mark_read(id).await? {
        tracing::debug!("contact {} marked read", id);
    }
    let contact = ContactSelector::new(&*state.db_pool)
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Contact"))?;
    Ok(Json(json!({"success": true, "contact": contact})))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<StatusInput>,
) -> Result<Json<Value>> {
    require_status(&input.status, CONTACT_STATUSES)?;
    let contact = ContactMutator::new(&*state.db_pool)
        .update_status(id, &input.status)
        .await?
        .ok_or(AppError::NotFound("Contact"))?;
    Ok(Json(json!({"success": true, "message": "Status updated", "contact": contact})))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    if !ContactMutator::new(&*state.db_pool).delete(id).await? {
        return Err(AppError::NotFound("Contact"));
    }
    Ok(Json(json!({"success": true, "message": "Contact deleted"})))
}
