use super::shutdown::ShutdownCoordinator;
use crate::errors::AppError;
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::{cors_layer, security_headers};
use axum::{
    Json, Router, middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::server::ServerConfig;
use std::any::Any;
use std::io;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Creates a configured Axum router with common middleware and documentation.
///
/// Sets up:
/// - OpenAPI JSON at [`OPENAPI_PATH`] plus Scalar, ReDoc and RapiDoc viewers
/// - the given API routes, mounted at the root
/// - JSON 404 and 405 fallbacks
/// - tracing, security headers, CORS, compression
/// - panic recovery that answers with a 500 error body
///
/// `CORS_ALLOWED_ORIGIN` takes a comma-separated origin list. When unset no
/// cross-origin access is granted.
///
/// # Errors
/// Returns an error if `CORS_ALLOWED_ORIGIN` holds an invalid value.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let cors = cors_layer(std::env::var("CORS_ALLOWED_ORIGIN").ok().as_deref())?;
    let openapi = T::openapi();

    let document = openapi.clone();
    let router = Router::new()
        .route(
            OPENAPI_PATH,
            get(move || {
                let document = document.clone();
                async move { Json(document) }
            }),
        )
        .merge(Redoc::with_url("/redoc", openapi.clone()))
        .merge(RapiDoc::new(OPENAPI_PATH).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", openapi))
        .merge(apis)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new());

    Ok(router)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::InternalServerError(format!("handler panicked: {}", detail)).into_response()
}

/// Serves `router` until SIGINT/SIGTERM, then shuts down in two phases.
///
/// 1. Stop accepting and drain in-flight requests, for at most
///    `shutdown_timeout`.
/// 2. Run `cleanup` (closing pools and the like), also bounded by
///    `shutdown_timeout`.
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     if let Err(e) = db.close().await {
///         tracing::warn!("Failed to close database: {}", e);
///     }
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();

    let signals = coordinator.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let drain = coordinator.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { drain.wait().await });

    let serve_result = tokio::select! {
        result = async move { server.await } => result,
        _ = async {
            coordinator.wait().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!(
                "In-flight requests still running after {:?}, dropping them",
                shutdown_timeout
            );
            Ok(())
        }
    };

    if let Err(e) = &serve_result {
        tracing::error!("Server encountered an error: {:?}", e);
    }

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "Test API"))]
    struct TestDoc;

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    fn app() -> Router {
        let apis = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .route("/boom", get(boom));
        create_router::<TestDoc>(apis).unwrap()
    }

    async fn call(request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_routes_are_mounted_at_root() {
        let (status, headers, body) = call(Request::get("/ping").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"pong");
        assert_eq!(headers["x-content-type-options"], "nosniff");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, _, body) = call(Request::get("/nope").body(Body::empty()).unwrap()).await;
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert_eq!(body["errorType"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_405() {
        let (status, _, body) = call(Request::delete("/ping").body(Body::empty()).unwrap()).await;
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["errorType"], "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn test_panic_becomes_500() {
        let (status, _, body) = call(Request::get("/boom").body(Body::empty()).unwrap()).await;
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errorType"], "INTERNAL_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("kaboom"));
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let (status, _, body) = call(Request::get(OPENAPI_PATH).body(Body::empty()).unwrap()).await;
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "Test API");
    }
}
