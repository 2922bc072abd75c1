//! Router, middleware and listener.

use axum::http::{header, HeaderValue, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use relay_app::AppContext;
use relay_errors::RelayError;
use std::any::Any;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Builds the full application: relay routes, static landing page and CORS.
pub fn create_router(ctx: AppContext) -> Router {
    let static_files = ServeDir::new(&ctx.config.static_dir);
    let cors = cors_layer(ctx.config.allowed_origin.as_deref());

    Router::new()
        .route(
            "/my-llp-endpoint/completions",
            post(handlers::completions::handle_completions),
        )
        .route(
            "/my-llp-endpoint/available-models",
            get(handlers::completions::handle_available_models),
        )
        .route("/my-gpt-endpoint", post(handlers::message::handle_message))
        .route(
            "/my-gpt-endpoint/{message}",
            get(handlers::message::handle_message_path),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback_service(static_files)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CompressionLayer::new())
        .with_state(ctx)
}

/// Single CORS policy. Without a configured origin no cross-origin caller is allowed.
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin {
        Some("*") => AllowOrigin::any(),
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::list([value]),
            Err(_) => {
                tracing::warn!("Allowed origin {:?} is not a valid header value", origin);
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        },
        None => AllowOrigin::list(Vec::<HeaderValue>::new()),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn method_not_allowed(method: Method, uri: Uri) -> RelayError {
    RelayError::MethodNotAllowed(format!("{} {}", method, uri.path()))
}

/// Turns a handler panic into the same JSON error body as every other failure.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);
    RelayError::Internal("unexpected failure while handling the request".to_string())
        .into_response()
}

pub async fn run_server(ctx: AppContext, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_router(ctx);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await
}
