use super::api::ApiDoc;
use crate::app::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(super) mod catalog;
pub(super) mod document;

pub fn router(state: AppState, origins: Vec<String>, upload_limit: usize) -> Router {
    let allow_origin = if origins.is_empty() {
        tracing::info!("No allowed origins configured, allowing any");
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.into_iter().map(|origin| {
            tracing::info!("Adding {origin} to allowed origins");
            HeaderValue::from_str(&origin).expect("invalid CORS origin")
        }))
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::PUT]);

    use catalog::*;
    use document::*;

    Router::new()
        .route("/api/upload", post(upload_document))
        .layer(DefaultBodyLimit::max(upload_limit))
        .route("/api/pdfs", get(list_documents))
        .route(
            "/api/pdfs/:id",
            get(get_document)
                .put(update_document)
                .delete(delete_document),
        )
        .route("/api/pdfs/title/:title", get(get_document_by_title))
        .route("/api/batch/delete", post(batch_delete))
        .route("/api/download/:id", get(download_document))
        .route("/api/thumbnail/:id", get(get_thumbnail))
        .route("/api/search", get(search))
        .route("/api/category/:name", get(filter_by_category))
        .route("/api/author/:name", get(filter_by_author))
        .route("/api/categories", get(list_categories))
        .route("/api/authors", get(list_authors))
        .route("/api/stats", get(stats))
        .route("/books", get(legacy_books))
        .route("/", get(health_check))
        .route("/_health", get(health_check))
        .with_state(state.services.clone())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http()
                .on_request(|req: &axum::http::Request<_>, _span: &Span| {
                    tracing::info!("Processing request | {} {}", req.method(), req.uri());
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, _span: &Span| {
                        let status = res.status();
                        let ctype = res
                            .headers()
                            .get("content-type")
                            .map(|v| v.to_str().unwrap_or("none"))
                            .unwrap_or("none");

                        tracing::info!(
                            "Sending response | {status} | {}ms | {ctype}",
                            latency.as_millis()
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        tracing::error!("Error in request: {error}")
                    },
                ),
        )
        .layer(cors)
}

/// Also served at `/`.
#[utoipa::path(
    get,
    path = "/_health",
    responses(
        (status = 200, description = "Service is up", body = String),
    )
)]
pub(crate) async fn health_check() -> impl IntoResponse {
    "OK"
}
