use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::Value;

use super::paginated;
use crate::{
    pkg::{
        internal::{
            adaptors::activity::{selectors::ActivitySelector, spec::FILTERS},
            listing::{PageRequest, Predicate},
        },
        server::state::AppState,
    },
    prelude::Result,
};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let predicate = Predicate::build(FILTERS, &params)?;
    let page = ActivitySelector::new(&*state.db_pool)
        .list(&predicate, PageRequest::from_params(&params))
        .await?;
    paginated("logs", page)
}
