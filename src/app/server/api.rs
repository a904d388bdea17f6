#[rustfmt::skip]
use super::router::{
    __path_health_check,
    // Documents
    document::{
        __path_list_documents,
        __path_get_document,
        __path_get_document_by_title,
        __path_upload_document,
        __path_update_document,
        __path_delete_document,
        __path_batch_delete,
        __path_download_document,
        __path_get_thumbnail,
        __path_legacy_books,
    },
    // Catalog
    catalog::{
        __path_search,
        __path_filter_by_category,
        __path_filter_by_author,
        __path_list_categories,
        __path_list_authors,
        __path_stats,
    },
};
use super::dto::{BatchDeletePayload, BatchDeleteResult, LegacyBook, UploadForm};
use crate::core::model::{
    document::{Document, DocumentStats, DocumentUpdate},
    Pagination,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Documents
        list_documents,
        get_document,
        get_document_by_title,
        upload_document,
        update_document,
        delete_document,
        batch_delete,
        download_document,
        get_thumbnail,
        legacy_books,
        // Catalog
        search,
        filter_by_category,
        filter_by_author,
        list_categories,
        list_authors,
        stats,
    ),
    components(schemas(
        Pagination,
        Document,
        DocumentUpdate,
        DocumentStats,
        UploadForm,
        BatchDeletePayload,
        BatchDeleteResult,
        LegacyBook,
    )),
    tags(
        (name = "pdfshelf", description = "PDF catalog API")
    )
)]
pub struct ApiDoc;
