use std::future::Future;
use std::net::SocketAddr;

use axum::{
    http::{header::HeaderValue, request::Parts},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth;
use crate::config::AppConfig;
use crate::routes::root::api_info;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/api/v1", get(api_info))
        .route("/api/v1/", get(api_info))
        .nest("/api/v1", Router::new().merge(auth::router()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Any origin in development; only whitelisted origins otherwise.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.environment.is_development() {
        return base.allow_origin(Any);
    }

    let whitelist = config.whitelist_origins.clone();
    base.allow_origin(AllowOrigin::predicate(
        move |origin: &HeaderValue, _parts: &Parts| {
            let allowed = origin
                .to_str()
                .map(|o| whitelist.iter().any(|w| w == o))
                .unwrap_or(false);
            if !allowed {
                warn!(?origin, "CORS error: origin is not allowed by CORS");
            }
            allowed
        },
    ))
}

pub async fn serve<F>(app: Router, config: &AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("server running: http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
