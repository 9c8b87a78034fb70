use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use super::paginated;
use crate::{
    pkg::{
        internal::{
            adaptors::newsletter::{
                mutators::SubscriberMutator,
                selectors::SubscriberSelector,
                spec::{FILTERS, Subscription},
            },
            listing::{PageRequest, Predicate},
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct EmailInput {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

pub async fn subscribe(
    State(state): State<AppState>,
    Json(input): Json<EmailInput>,
) -> Result<(StatusCode, Json<Value>)> {
    input.validate()?;
    let outcome = SubscriberMutator::new(&*state.db_pool)
        .subscribe(&input.email)
        .await?;
    let (status, message) = match outcome {
        Subscription::Created => (StatusCode::CREATED, "Subscribed"),
        Subscription::Reactivated => (StatusCode::OK, "Subscription reactivated"),
    };
    Ok((status, Json(json!({"success": true, "message": message}))))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(input): Json<EmailInput>,
) -> Result<Json<Value>> {
    input.validate()?;
    if !SubscriberMutator::new(&*state.db_pool)
        .unsubscribe(&input.email)
        .await?
    {
        return Err(AppError::NotFound("Subscription"));
    }
    Ok(Json(json!({"success": true, "message": "Unsubscribed"})))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let predicate = Predicate::build(FILTERS, &params)?;
    let page = SubscriberSelector::new(&*state.db_pool)
        .list(&predicate, PageRequest::from_params(&params))
        .await?;
    paginated("subscribers", page)
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    if !SubscriberMutator::new(&*state.db_pool).delete(id).await? {
        return Err(AppError::NotFound("Subscriber"));
    }
    Ok(Json(json!({"success": true, "message": "Subscriber deleted"})))
}
