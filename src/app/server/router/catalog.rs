use crate::{
    app::{server::dto::SearchQuery, state::ServiceState},
    core::model::{
        document::{Document, DocumentStats},
        List,
    },
    error::ShelfError,
    map_err,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/api/search",
    responses(
        (status = 200, description = "Documents matching the search term", body = inline(List<Document>)),
        (status = 400, description = "Missing search term"),
        (status = 500, description = "Internal server error")
    ),
    params(SearchQuery),
)]
pub(crate) async fn search(
    services: State<ServiceState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<List<Document>>, ShelfError> {
    let Query(query) = map_err!(query);
    let documents = services.document.search(&query.q).await?;
    Ok(Json(documents))
}

#[utoipa::path(
    get,
    path = "/api/category/{name}",
    responses(
        (status = 200, description = "Documents in the category", body = inline(List<Document>)),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("name" = String, Path, description = "Exact category name")
    )
)]
pub(crate) async fn filter_by_category(
    services: State<ServiceState>,
    Path(name): Path<String>,
) -> Result<Json<List<Document>>, ShelfError> {
    let documents = services.document.filter_by_category(&name).await?;
    Ok(Json(documents))
}

#[utoipa::path(
    get,
    path = "/api/author/{name}",
    responses(
        (status = 200, description = "Documents by the author", body = inline(List<Document>)),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("name" = String, Path, description = "Exact author name")
    )
)]
pub(crate) async fn filter_by_author(
    services: State<ServiceState>,
    Path(name): Path<String>,
) -> Result<Json<List<Document>>, ShelfError> {
    let documents = services.document.filter_by_author(&name).await?;
    Ok(Json(documents))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Distinct categories, sorted", body = [String]),
        (status = 500, description = "Internal server error")
    )
)]
pub(crate) async fn list_categories(
    services: State<ServiceState>,
) -> Result<Json<Vec<String>>, ShelfError> {
    Ok(Json(services.document.list_categories().await?))
}

#[utoipa::path(
    get,
    path = "/api/authors",
    responses(
        (status = 200, description = "Distinct authors, sorted", body = [String]),
        (status = 500, description = "Internal server error")
    )
)]
pub(crate) async fn list_authors(
    services: State<ServiceState>,
) -> Result<Json<Vec<String>>, ShelfError> {
    Ok(Json(services.document.list_authors().await?))
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Catalog statistics", body = DocumentStats),
        (status = 500, description = "Internal server error")
    )
)]
pub(crate) async fn stats(
    services: State<ServiceState>,
) -> Result<Json<DocumentStats>, ShelfError> {
    Ok(Json(services.document.stats().await?))
}
