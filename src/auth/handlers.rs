use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{RegisterRequest, RegisterResponse},
        services::{gen_username, hash_password},
    },
    error::ApiError,
    state::AppState,
    users::validation::validate,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/register", post(register))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    match create_user(&state, payload).await {
        Ok(response) => Ok((StatusCode::CREATED, Json(response))),
        Err(e) => {
            error!(error = %e, "error during user registration");
            Err(e)
        }
    }
}

async fn create_user(
    state: &AppState,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<RegisterResponse, ApiError> {
    let Json(payload) = payload?;

    let mut new_user = validate(payload.into_draft(gen_username()))?;
    new_user.password = hash_password(&new_user.password)?;

    let user = state.users.insert(new_user).await?;

    info!(username = %user.username, role = ?user.role, "user registered");
    Ok(RegisterResponse { user: user.into() })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use regex::Regex;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::users::Role;

    async fn post_register(app: Router, body: Body) -> (StatusCode, Value) {
        let res = app
            .oneshot(
                Request::post("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_body(v: Value) -> Body {
        Body::from(v.to_string())
    }

    #[tokio::test]
    async fn register_returns_created_projection_without_password() {
        let (state, store) = AppState::fake();
        let app = auth_routes().with_state(state);

        let (status, body) = post_register(
            app,
            json_body(json!({ "email": "writer@example.com", "password": "hunter22" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let user = body["user"].as_object().unwrap();
        assert_eq!(user.len(), 3);
        assert_eq!(user["email"], "writer@example.com");
        assert_eq!(user["role"], "user");
        assert!(!user.contains_key("password"));

        let re = Regex::new(r"^user-[0-9a-z]+$").unwrap();
        assert!(re.is_match(user["username"].as_str().unwrap()));

        let stored = store.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].role, Role::User);
        assert!(stored[0].password.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn register_accepts_admin_role() {
        let (state, _) = AppState::fake();
        let app = auth_routes().with_state(state);

        let (status, body) = post_register(
            app,
            json_body(json!({ "email": "boss@example.com", "password": "pw", "role": "admin" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["role"], "admin");
    }

    #[tokio::test]
    async fn duplicate_email_is_an_opaque_server_error() {
        let (state, store) = AppState::fake();
        let app = auth_routes().with_state(state);
        let body = json!({ "email": "twice@example.com", "password": "pw" });

        let (first, _) = post_register(app.clone(), json_body(body.clone())).await;
        assert_eq!(first, StatusCode::CREATED);

        // Not a 409: duplicates are indistinguishable from other failures.
        let (second, err) = post_register(app, json_body(body)).await;
        assert_eq!(second, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err["code"], "ServerError");
        assert_eq!(err["message"], "Internal server error");
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn unsupported_role_is_rejected() {
        let (state, store) = AppState::fake();
        let app = auth_routes().with_state(state);

        let (status, err) = post_register(
            app,
            json_body(json!({ "email": "x@example.com", "password": "pw", "role": "root" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err["code"], "ServerError");
        assert_eq!(err["error"][0]["field"], "role");
        assert_eq!(err["error"][0]["message"], "root is not supported");
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_are_reported() {
        let (state, _) = AppState::fake();
        let app = auth_routes().with_state(state);

        let (status, err) = post_register(app, json_body(json!({}))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let fields: Vec<&str> = err["error"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[tokio::test]
    async fn malformed_body_is_a_server_error() {
        let (state, _) = AppState::fake();
        let app = auth_routes().with_state(state);

        let (status, err) = post_register(app, Body::from("{not json")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err["code"], "ServerError");
        assert!(err["error"].as_str().unwrap().contains("invalid request body"));
    }
}
