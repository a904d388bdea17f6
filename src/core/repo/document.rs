use super::Atomic;
use crate::{
    core::model::{
        document::{Document, DocumentInsert, DocumentUpdate},
        List, Pagination,
    },
    error::ShelfError,
};
use std::future::Future;

/// Keeps track of catalog entries. Info obtained from here is used to locate files
/// in a [DocumentStore][crate::core::document::store::DocumentStore].
pub trait DocumentRepo: Atomic {
    /// Get document metadata based on ID.
    ///
    /// * `id`: Document ID.
    fn get_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Document>, ShelfError>> + Send;

    /// Get document metadata based on ID within a transaction, locking the row
    /// until the transaction ends.
    ///
    /// * `id`: Document ID.
    /// * `tx`: The transaction to use.
    fn get_by_id_tx(
        &self,
        id: i64,
        tx: &mut <Self as Atomic>::Tx,
    ) -> impl Future<Output = Result<Option<Document>, ShelfError>> + Send;

    /// Get document metadata by exact title. If multiple documents share the
    /// title, the one with the lowest ID is returned.
    ///
    /// * `title`: Document title.
    fn get_by_title(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<Option<Document>, ShelfError>> + Send;

    /// List documents ordered by ID.
    ///
    /// * `p`: Pagination params.
    fn list(&self, p: Pagination) -> impl Future<Output = Result<List<Document>, ShelfError>> + Send;

    /// List every document, ordered by ID.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Document>, ShelfError>> + Send;

    /// Case insensitive substring search over title, author, category and description.
    ///
    /// * `query`: Raw search term, matched literally.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Document>, ShelfError>> + Send;

    /// Documents with the exact category.
    ///
    /// * `category`: Category name.
    fn list_by_category(
        &self,
        category: &str,
    ) -> impl Future<Output = Result<Vec<Document>, ShelfError>> + Send;

    /// Documents with the exact author.
    ///
    /// * `author`: Author name.
    fn list_by_author(
        &self,
        author: &str,
    ) -> impl Future<Output = Result<Vec<Document>, ShelfError>> + Send;

    /// Distinct categories, sorted.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<String>, ShelfError>> + Send;

    /// Distinct authors, sorted.
    fn list_authors(&self) -> impl Future<Output = Result<Vec<String>, ShelfError>> + Send;

    /// Total amount of documents.
    fn count(&self) -> impl Future<Output = Result<i64, ShelfError>> + Send;

    /// Amount of documents per category.
    fn count_by_category(
        &self,
    ) -> impl Future<Output = Result<Vec<(String, i64)>, ShelfError>> + Send;

    /// Amount of documents per author.
    fn count_by_author(&self)
        -> impl Future<Output = Result<Vec<(String, i64)>, ShelfError>> + Send;

    /// The `limit` most downloaded documents, ties broken by ascending ID.
    fn top_downloaded(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Document>, ShelfError>> + Send;

    /// The `limit` most recently uploaded documents, ties broken by ascending ID.
    fn most_recent(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Document>, ShelfError>> + Send;

    /// Insert document metadata.
    ///
    /// * `document`: Insert payload.
    /// * `tx`: The transaction to run in.
    fn insert(
        &self,
        document: DocumentInsert<'_>,
        tx: &mut <Self as Atomic>::Tx,
    ) -> impl Future<Output = Result<Document, ShelfError>> + Send;

    /// Set the thumbnail reference of a document.
    ///
    /// * `id`: Document ID.
    /// * `thumbnail_ref`: Thumbnail path relative to the storage root.
    /// * `tx`: The transaction to run in.
    fn set_thumbnail(
        &self,
        id: i64,
        thumbnail_ref: &str,
        tx: &mut <Self as Atomic>::Tx,
    ) -> impl Future<Output = Result<Document, ShelfError>> + Send;

    /// Update document metadata. Returns `None` if the document does not exist.
    ///
    /// * `id`: Document ID.
    /// * `document`: Update payload.
    fn update(
        &self,
        id: i64,
        document: &DocumentUpdate,
    ) -> impl Future<Output = Result<Option<Document>, ShelfError>> + Send;

    /// Atomically increment the download counter, returning the updated document
    /// or `None` if it does not exist.
    ///
    /// * `id`: Document ID.
    /// * `tx`: The transaction to run in.
    fn increment_downloads(
        &self,
        id: i64,
        tx: &mut <Self as Atomic>::Tx,
    ) -> impl Future<Output = Result<Option<Document>, ShelfError>> + Send;

    /// Remove document metadata by id.
    ///
    /// * `id`: Document ID.
    fn remove_by_id(&self, id: i64) -> impl Future<Output = Result<u64, ShelfError>> + Send;

    /// Remove document metadata by id in the given transaction.
    ///
    /// * `id`: Document ID.
    /// * `tx`: The transaction to run in.
    fn remove_by_id_tx(
        &self,
        id: i64,
        tx: &mut <Self as Atomic>::Tx,
    ) -> impl Future<Output = Result<u64, ShelfError>> + Send;
}
