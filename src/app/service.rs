use super::document::store::FsDocumentStore;
use crate::core::service::document::DocumentService;
use sqlx::PgPool;

/// The catalog service, backed by postgres and the local filesystem.
pub type CatalogService = DocumentService<PgPool, FsDocumentStore>;
