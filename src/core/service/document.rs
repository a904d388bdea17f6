use crate::{
    core::{
        document::{sanitize_file_name, store::DocumentStore},
        model::{
            document::{Document, DocumentInsert, DocumentStats, DocumentUpdate, FileType},
            List, Pagination,
        },
        repo::{document::DocumentRepo, Atomic},
    },
    err,
    error::ShelfError,
    map_err, transaction,
};
use dto::DocumentUpload;
use tracing::{debug, error, info, warn};
use validify::Validate;

/// Amount of documents in each of the ranked lists in [DocumentStats].
const STATS_TOP_N: i64 = 5;

/// High level operations for catalog management.
///
/// Every document owns a directory in the store named after its ID. The row is the
/// source of truth; its files are written before the row commits and removed before
/// the row is deleted.
#[derive(Debug, Clone)]
pub struct DocumentService<R, S> {
    pub repo: R,
    pub store: S,
}

impl<R, S> DocumentService<R, S>
where
    R: DocumentRepo + Send + Sync,
    S: DocumentStore + Send + Sync,
{
    pub fn new(repo: R, store: S) -> Self {
        Self { repo, store }
    }

    /// Get a paginated list of documents from the repository.
    ///
    /// * `p`: Pagination options.
    pub async fn list_documents(&self, p: Pagination) -> Result<List<Document>, ShelfError> {
        map_err!(p.validate());
        self.repo.list(p).await
    }

    /// Get every document, ordered by ID.
    pub async fn list_all(&self) -> Result<Vec<Document>, ShelfError> {
        self.repo.list_all().await
    }

    /// Get a document from the repository.
    ///
    /// * `id`: Document ID.
    pub async fn get_document(&self, id: i64) -> Result<Document, ShelfError> {
        match self.repo.get_by_id(id).await? {
            Some(document) => Ok(document),
            None => err!(DoesNotExist, "Document with ID {id}"),
        }
    }

    /// Get a document by its exact title.
    ///
    /// * `title`: Document title.
    pub async fn get_document_by_title(&self, title: &str) -> Result<Document, ShelfError> {
        match self.repo.get_by_title(title).await? {
            Some(document) => Ok(document),
            None => err!(DoesNotExist, "Document with title '{title}'"),
        }
    }

    /// Validate the upload, insert the document metadata to the repository and
    /// persist its files in the store.
    ///
    /// The row is inserted first to obtain the storage key. If writing any of the
    /// files or committing fails, the transaction is aborted and the document's
    /// directory is discarded, so a failed upload leaves neither a row nor files.
    ///
    /// * `params`: Upload params.
    pub async fn upload(&self, params: DocumentUpload<'_>) -> Result<Document, ShelfError> {
        let DocumentUpload {
            title,
            author,
            category,
            description,
            file_name,
            file,
            thumbnail,
        } = params;

        let title = required("title", title.as_deref())?;
        let author = required("author", author.as_deref())?;
        let category = required("category", category.as_deref())?;
        let description = description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let Some(file_name) = file_name else {
            return err!(MissingField, "file");
        };

        if file.is_empty() {
            return err!(InvalidFile, "'{file_name}' is empty");
        }

        FileType::try_from_file_name(&file_name)?;
        let stored_filename = sanitize_file_name(&file_name)?;
        FileType::try_from_file_name(&stored_filename)?;

        let thumbnail = match thumbnail {
            Some(thumbnail) => match FileType::try_from_file_name(thumbnail.name) {
                Ok(_) if thumbnail.file.is_empty() => {
                    warn!("Thumbnail '{}' is empty, skipping", thumbnail.name);
                    None
                }
                Ok(ty) => Some((ty, thumbnail.file)),
                Err(e) => {
                    warn!("Thumbnail '{}' not stored; {e}", thumbnail.name);
                    None
                }
            },
            None => None,
        };

        let insert = DocumentInsert::new(title, author, category, &stored_filename)
            .with_description(description);

        let mut tx = self.repo.start_tx().await?;

        let document = match self.repo.insert(insert, &mut tx).await {
            Ok(document) => document,
            Err(e) => {
                self.repo.abort_tx(tx).await?;
                return Err(e);
            }
        };

        let key = document.storage_key();

        let document = match self.write_files(document, file, thumbnail, &mut tx).await {
            Ok(document) => document,
            Err(e) => {
                self.discard(&key).await;
                self.repo.abort_tx(tx).await?;
                return Err(e);
            }
        };

        if let Err(e) = self.repo.commit_tx(tx).await {
            self.discard(&key).await;
            return Err(e);
        }

        info!(
            "Uploaded '{}' as '{}' ({})",
            document.title, document.stored_filename, document.id
        );

        Ok(document)
    }

    /// Update the document's metadata. Never touches its files.
    ///
    /// * `id`: Document ID.
    /// * `update`: Fields to change, at least one must be present.
    pub async fn update(&self, id: i64, update: DocumentUpdate) -> Result<Document, ShelfError> {
        if update.is_empty() {
            return err!(NoData, "no fields to update");
        }

        let update = DocumentUpdate {
            title: optional_required("title", update.title)?,
            author: optional_required("author", update.author)?,
            category: optional_required("category", update.category)?,
            description: update.description.map(|d| d.trim().to_string()),
        };

        match self.repo.update(id, &update).await? {
            Some(document) => Ok(document),
            None => err!(DoesNotExist, "Document with ID {id}"),
        }
    }

    /// Remove the document's files from the store, then its row from the repository.
    /// If removing the files fails the row stays in place.
    ///
    /// * `id`: Document ID.
    pub async fn delete(&self, id: i64) -> Result<(), ShelfError> {
        let document = self.get_document(id).await?;
        self.remove_files(&document).await?;
        self.repo.remove_by_id(id).await?;
        info!("Deleted '{}' ({id})", document.title);
        Ok(())
    }

    /// Delete multiple documents, committing all row removals at once after the
    /// files of every document have been handled. Rows are read and locked in the
    /// same transaction, so a call only ever holds one connection. Unknown IDs and
    /// documents whose files could not be removed are skipped.
    /// Returns the amount of deleted documents.
    ///
    /// * `ids`: Document IDs.
    pub async fn batch_delete(&self, ids: &[i64]) -> Result<u64, ShelfError> {
        if ids.is_empty() {
            return err!(NoData, "no document IDs provided");
        }

        let deleted = transaction!(self.repo, |tx| async move {
            let mut deleted = 0;

            for &id in ids {
                let Some(document) = self.repo.get_by_id_tx(id, tx).await? else {
                    debug!("Document {id} does not exist, skipping");
                    continue;
                };

                if let Err(e) = self.remove_files(&document).await {
                    error!("Unable to remove files of document {id}, skipping; {e}");
                    continue;
                }

                deleted += self.repo.remove_by_id_tx(id, tx).await?;
            }

            Ok::<_, ShelfError>(deleted)
        })?;

        info!("Batch deleted {deleted} of {} documents", ids.len());

        Ok(deleted)
    }

    /// Case insensitive substring search over title, author, category and description.
    ///
    /// * `query`: Search term.
    pub async fn search(&self, query: &str) -> Result<List<Document>, ShelfError> {
        let query = query.trim();
        if query.is_empty() {
            return err!(MissingField, "q");
        }
        Ok(self.repo.search(query).await?.into())
    }

    /// Documents in the exact category.
    ///
    /// * `category`: Category name.
    pub async fn filter_by_category(&self, category: &str) -> Result<List<Document>, ShelfError> {
        Ok(self.repo.list_by_category(category).await?.into())
    }

    /// Documents by the exact author.
    ///
    /// * `author`: Author name.
    pub async fn filter_by_author(&self, author: &str) -> Result<List<Document>, ShelfError> {
        Ok(self.repo.list_by_author(author).await?.into())
    }

    pub async fn list_categories(&self) -> Result<Vec<String>, ShelfError> {
        self.repo.list_categories().await
    }

    pub async fn list_authors(&self) -> Result<Vec<String>, ShelfError> {
        self.repo.list_authors().await
    }

    /// Aggregate catalog statistics.
    pub async fn stats(&self) -> Result<DocumentStats, ShelfError> {
        Ok(DocumentStats {
            total: self.repo.count().await?,
            per_category: self.repo.count_by_category().await?.into_iter().collect(),
            per_author: self.repo.count_by_author().await?.into_iter().collect(),
            top_downloaded: self.repo.top_downloaded(STATS_TOP_N).await?,
            most_recent: self.repo.most_recent(STATS_TOP_N).await?,
        })
    }

    /// Read the document's file, incrementing its download counter.
    /// The increment is rolled back if the file cannot be read.
    ///
    /// * `id`: Document ID.
    pub async fn download(&self, id: i64) -> Result<(Document, Vec<u8>), ShelfError> {
        transaction!(self.repo, |tx| async move {
            let Some(document) = self.repo.increment_downloads(id, tx).await? else {
                return err!(DoesNotExist, "Document with ID {id}");
            };

            let content = self.store.read(&document.file_path()).await?;

            debug!(
                "Serving '{}' ({id}), download #{}",
                document.stored_filename, document.download_count
            );

            Ok::<_, ShelfError>((document, content))
        })
    }

    /// Read the document's thumbnail.
    ///
    /// * `id`: Document ID.
    pub async fn thumbnail(&self, id: i64) -> Result<(Document, Vec<u8>), ShelfError> {
        let document = self.get_document(id).await?;

        let Some(ref path) = document.thumbnail_ref else {
            return err!(DoesNotExist, "Thumbnail for document with ID {id}");
        };

        let content = self.store.read(path).await?;

        Ok((document, content))
    }

    /// Write the document file and optional thumbnail into the document's directory.
    async fn write_files(
        &self,
        document: Document,
        file: &[u8],
        thumbnail: Option<(FileType, &[u8])>,
        tx: &mut <R as Atomic>::Tx,
    ) -> Result<Document, ShelfError> {
        let key = document.storage_key();

        self.store
            .write(&key, &document.stored_filename, file)
            .await?;

        let Some((ty, content)) = thumbnail else {
            return Ok(document);
        };

        // Sanitized names never start with `_`, so this cannot clash with the document file.
        let thumbnail_ref = self
            .store
            .write(&key, &format!("_thumbnail.{ty}"), content)
            .await?;

        self.repo.set_thumbnail(document.id, &thumbnail_ref, tx).await
    }

    /// Remove the document file, its thumbnail and the then empty directory.
    /// Files already missing from the store are not an error.
    async fn remove_files(&self, document: &Document) -> Result<(), ShelfError> {
        let paths = std::iter::once(document.file_path()).chain(document.thumbnail_ref.clone());

        for path in paths {
            if !self.store.delete(&path).await? {
                warn!("File '{path}' was already missing from storage");
            }
        }

        let key = document.storage_key();
        if !self.store.remove_dir_if_empty(&key).await? {
            warn!("Directory '{key}' not removed, it is either missing or not empty");
        }

        Ok(())
    }

    /// Remove the directory of an upload that did not make it into the repository.
    async fn discard(&self, key: &str) {
        match self.store.purge(key).await {
            Ok(()) => debug!("Discarded files for '{key}'"),
            Err(e) => error!("Unable to discard files for '{key}'; {e}"),
        }
    }
}

/// Trimmed value of a required field, or `MissingField` if absent or blank.
fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ShelfError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => err!(MissingField, "{field}"),
    }
}

/// Like [required], but for fields that may be omitted from updates.
fn optional_required(field: &str, value: Option<String>) -> Result<Option<String>, ShelfError> {
    value
        .as_deref()
        .map(|value| required(field, Some(value)).map(String::from))
        .transpose()
}

/// Document service DTOs.
pub mod dto {
    /// Upload parameters as received from the client. Required fields are
    /// optional here so their absence can be reported.
    #[derive(Debug, Default)]
    pub struct DocumentUpload<'a> {
        pub title: Option<String>,

        pub author: Option<String>,

        pub category: Option<String>,

        pub description: Option<String>,

        /// Original name of the uploaded file.
        pub file_name: Option<String>,

        /// Document file.
        pub file: &'a [u8],

        pub thumbnail: Option<ThumbnailUpload<'a>>,
    }

    #[derive(Debug)]
    pub struct ThumbnailUpload<'a> {
        /// Original name of the thumbnail file.
        pub name: &'a str,

        /// Thumbnail file.
        pub file: &'a [u8],
    }
}
