use crate::{
    app::{
        server::dto::{
            BatchDeletePayload, BatchDeleteResult, LegacyBook, UploadFields, UploadForm,
        },
        state::ServiceState,
    },
    core::model::{
        document::{Document, DocumentUpdate, FileType},
        List, Pagination,
    },
    error::ShelfError,
    map_err,
};
use axum::{
    extract::{rejection::QueryRejection, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

/// Fallback content type for stored files with an unrecognised extension.
const OCTET_STREAM: &str = "application/octet-stream";

#[utoipa::path(
    get,
    path = "/api/pdfs",
    responses(
        (status = 200, description = "List documents", body = inline(List<Document>)),
        (status = 400, description = "Malformed pagination parameters"),
        (status = 422, description = "Pagination parameters out of range"),
        (status = 500, description = "Internal server error")
    ),
    params(Pagination),
)]
pub(crate) async fn list_documents(
    services: State<ServiceState>,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<List<Document>>, ShelfError> {
    let Query(pagination) = map_err!(pagination);
    let documents = services.document.list_documents(pagination).await?;
    Ok(Json(documents))
}

#[utoipa::path(
    get,
    path = "/api/pdfs/{id}",
    responses(
        (status = 200, description = "Get document by ID", body = Document),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = i64, Path, description = "Document ID")
    )
)]
pub(crate) async fn get_document(
    services: State<ServiceState>,
    Path(id): Path<i64>,
) -> Result<Json<Document>, ShelfError> {
    let document = services.document.get_document(id).await?;
    Ok(Json(document))
}

#[utoipa::path(
    get,
    path = "/api/pdfs/title/{title}",
    responses(
        (status = 200, description = "Get document by exact title", body = Document),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("title" = String, Path, description = "Document title")
    )
)]
pub(crate) async fn get_document_by_title(
    services: State<ServiceState>,
    Path(title): Path<String>,
) -> Result<Json<Document>, ShelfError> {
    let document = services.document.get_document_by_title(&title).await?;
    Ok(Json(document))
}

#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 201, description = "Document uploaded", body = Document),
        (status = 400, description = "Missing field or invalid file"),
        (status = 500, description = "Internal server error")
    ),
    request_body(content = UploadForm, content_type = "multipart/form-data")
)]
pub(crate) async fn upload_document(
    services: State<ServiceState>,
    form: Multipart,
) -> Result<(StatusCode, Json<Document>), ShelfError> {
    let fields = UploadFields::read(form).await?;
    let document = services.document.upload(fields.as_upload()).await?;

    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    put,
    path = "/api/pdfs/{id}",
    responses(
        (status = 200, description = "Document metadata updated", body = Document),
        (status = 400, description = "No fields or blank required field"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = i64, Path, description = "Document ID")
    ),
    request_body = DocumentUpdate
)]
pub(crate) async fn update_document(
    services: State<ServiceState>,
    Path(id): Path<i64>,
    Json(update): Json<DocumentUpdate>,
) -> Result<Json<Document>, ShelfError> {
    let document = services.document.update(id, update).await?;
    Ok(Json(document))
}

#[utoipa::path(
    delete,
    path = "/api/pdfs/{id}",
    responses(
        (status = 204, description = "Document and its files deleted"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = i64, Path, description = "Document ID")
    )
)]
pub(crate) async fn delete_document(
    services: State<ServiceState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ShelfError> {
    services.document.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/batch/delete",
    responses(
        (status = 200, description = "Amount of deleted documents", body = BatchDeleteResult),
        (status = 400, description = "No IDs provided"),
        (status = 500, description = "Internal server error")
    ),
    request_body = BatchDeletePayload
)]
pub(crate) async fn batch_delete(
    services: State<ServiceState>,
    Json(payload): Json<BatchDeletePayload>,
) -> Result<Json<BatchDeleteResult>, ShelfError> {
    let deleted = services.document.batch_delete(&payload.ids).await?;
    Ok(Json(BatchDeleteResult { deleted }))
}

#[utoipa::path(
    get,
    path = "/api/download/{id}",
    responses(
        (status = 200, description = "Document file as an attachment", content_type = "application/octet-stream"),
        (status = 404, description = "Document or its file not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = i64, Path, description = "Document ID")
    )
)]
pub(crate) async fn download_document(
    services: State<ServiceState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ShelfError> {
    let (document, content) = services.document.download(id).await?;

    let mime = document
        .file_type()
        .map(|ty| ty.mime())
        .unwrap_or(OCTET_STREAM);

    let headers = [
        (header::CONTENT_TYPE, mime.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.stored_filename),
        ),
    ];

    Ok((headers, content))
}

#[utoipa::path(
    get,
    path = "/api/thumbnail/{id}",
    responses(
        (status = 200, description = "Thumbnail image", content_type = "image/*"),
        (status = 404, description = "Document or thumbnail not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = i64, Path, description = "Document ID")
    )
)]
pub(crate) async fn get_thumbnail(
    services: State<ServiceState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ShelfError> {
    let (document, content) = services.document.thumbnail(id).await?;

    let mime = document
        .thumbnail_ref
        .as_deref()
        .and_then(|path| FileType::try_from_file_name(path).ok())
        .map(|ty| ty.mime())
        .unwrap_or(OCTET_STREAM);

    Ok(([(header::CONTENT_TYPE, mime)], content))
}

#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "Every document as a book listing", body = [LegacyBook]),
        (status = 500, description = "Internal server error")
    )
)]
pub(crate) async fn legacy_books(
    services: State<ServiceState>,
) -> Result<Json<Vec<LegacyBook>>, ShelfError> {
    let books = services
        .document
        .list_all()
        .await?
        .into_iter()
        .map(LegacyBook::from)
        .collect();
    Ok(Json(books))
}
