use std::net::SocketAddr;

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json, Router,
};
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use crate::{exercises, users};

/// Dropping the timed-out handler future also cancels its pending query.
async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        tracing::warn!("request timed out");
        return AppError::Timeout.into_response();
    }
    tracing::error!(error = %err, "middleware error");
    let body = ErrorBody {
        message: "internal server error".into(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

pub fn build_app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .merge(users::router())
        .merge(exercises::router())
        .route_service("/", ServeFile::new(&config.index_page))
        .nest_service("/assets", ServeDir::new(&config.assets_dir))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(config.request_timeout),
        )
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
