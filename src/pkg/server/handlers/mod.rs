pub mod activity;
pub mod applications;
pub mod auth;
pub mod careers;
pub mod contacts;
pub mod dashboard;
pub mod jobs;
pub mod newsletter;
pub mod probes;

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    pkg::internal::listing::Page,
    prelude::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    #[serde(default)]
    pub status: String,
}

/// `{success, <key>: rows, pagination}`
pub(crate) fn paginated<T: Serialize>(key: &str, page: Page<T>) -> Result<Json<Value>> {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(true));
    body.insert(key.into(), serde_json::to_value(page.rows)?);
    body.insert("pagination".into(), serde_json::to_value(page.pagination)?);
    Ok(Json(Value::Object(body)))
}

pub(crate) fn require_status(status: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&status) {
        Ok(())
    } else {
        Err(AppError::invalid(
            "status",
            &format!("Status must be one of: {}", allowed.join(", ")),
        ))
    }
}
