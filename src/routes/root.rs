use axum::{extract::State, Json};
use serde::Serialize;
use time::OffsetDateTime;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub docs: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// `GET /api/v1/`: liveness plus build and docs info.
pub async fn api_info(State(state): State<AppState>) -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "API is live",
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        docs: state.config.docs_url.clone(),
        timestamp: OffsetDateTime::now_utc(),
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use serde_json::Value;
    use time::format_description::well_known::Rfc3339;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn api_info_reports_live_status_and_timestamp() {
        let (state, _) = AppState::fake();
        let app = Router::new().route("/", get(api_info)).with_state(state);

        let res = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "API is live");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["docs"], "https://docs.test.local");

        let ts = body["timestamp"].as_str().unwrap();
        let parsed = OffsetDateTime::parse(ts, &Rfc3339).expect("RFC 3339 timestamp");
        assert_eq!(parsed.offset(), time::UtcOffset::UTC);
    }
}
