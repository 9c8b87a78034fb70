use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::conf::settings;

pub type Result<T> = core::result::Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("email is already subscribed")]
    AlreadySubscribed,

    #[error("authentication required")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("uploaded file exceeds the size limit")]
    PayloadTooLarge,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ERR-VALIDATION",
            AppError::BadRequest(_) => "ERR-REQUEST-001",
            AppError::AlreadySubscribed => "ERR-NEWSLETTER-001",
            AppError::Unauthorized => "ERR-AUTH-001",
            AppError::NotFound(_) => "ERR-NOT-FOUND",
            AppError::PayloadTooLarge => "ERR-UPLOAD-001",
            AppError::Database(_) => "ERR-DB-000",
            AppError::Io(_) => "ERR-IO-000",
            AppError::Internal(_) => "ERR-INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::AlreadySubscribed => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self, debug: bool) -> serde_json::Value {
        match self {
            AppError::Validation(errors) => json!({
                "success": false,
                "code": self.code(),
                "message": "Validation failed",
                "errors": errors,
            }),
            AppError::AlreadySubscribed => json!({
                "success": false,
                "code": self.code(),
                "message": "Email is already subscribed",
            }),
            AppError::Unauthorized => json!({
                "success": false,
                "code": self.code(),
                "message": "Authentication required",
            }),
            AppError::NotFound(entity) => json!({
                "success": false,
                "code": self.code(),
                "message": format!("{entity} not found"),
            }),
            AppError::BadRequest(_) | AppError::PayloadTooLarge => json!({
                "success": false,
                "code": self.code(),
                "message": self.to_string(),
            }),
            AppError::Database(_) | AppError::Io(_) | AppError::Internal(_) => {
                let mut body = json!({
                    "success": false,
                    "code": self.code(),
                    "message": "Internal server error",
                });
                if debug {
                    body["error"] = json!(self.to_string());
                }
                body
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::BadRequest(format!("malformed multipart body: {}", err.body_text()))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!("rejected token: {}", err);
        AppError::Unauthorized
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "request failed: {}", &self);
        }
        (status, Json(self.body(settings.debug))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Input {
        #[validate(email(message = "Enter a valid email"))]
        email: String,
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn test_validation_errors_are_sorted_by_field() {
        let input = Input {
            email: "nope".into(),
            name: "".into(),
        };
        let err: AppError = input.validate().unwrap_err().into();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            fields,
            vec![
                FieldError::new("email", "Enter a valid email"),
                FieldError::new("name", "Name is required"),
            ]
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::AlreadySubscribed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("Job").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Database(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_only_in_debug() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        assert!(err.body(false).get("error").is_none());
        assert!(err.body(true)["error"].as_str().unwrap().contains("pool timed out"));
        assert_eq!(err.body(false)["message"], "Internal server error");
    }
}
