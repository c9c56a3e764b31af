use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::users::{validation::ValidationErrors, StoreError};

/// Failures while handling a request. Clients only ever see an opaque 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: &'static str,
    pub error: Value,
}

impl ApiError {
    fn detail(&self) -> Value {
        match self {
            Self::Validation(errs) => json!(errs.fields()),
            other => Value::String(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: "ServerError",
            message: "Internal server error",
            error: self.detail(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::validation::FieldError;

    #[test]
    fn validation_detail_lists_fields() {
        let err = ApiError::from(ValidationErrors(vec![FieldError {
            field: "email",
            message: "Email is required".into(),
        }]));
        assert_eq!(
            err.detail(),
            json!([{ "field": "email", "message": "Email is required" }])
        );
    }

    #[test]
    fn duplicate_is_still_a_server_error() {
        let err = ApiError::from(StoreError::Duplicate("email: a@b.io".into()));
        assert_eq!(err.detail(), json!("duplicate key: email: a@b.io"));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
