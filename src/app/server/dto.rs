//! Http specific DTOs.

use crate::{
    core::{
        model::document::Document,
        service::document::dto::{DocumentUpload, ThumbnailUpload},
    },
    error::ShelfError,
    map_err,
};
use axum::{body::Bytes, extract::Multipart};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Multipart form accepted by the upload endpoint.
#[allow(dead_code)]
#[derive(Debug, ToSchema)]
pub(crate) struct UploadForm {
    /// The document file, one of `pdf`, `jpg`, `jpeg`, `png`.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,

    pub title: String,

    pub author: String,

    pub category: String,

    pub description: Option<String>,

    /// Optional thumbnail image.
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumbnail: Option<Vec<u8>>,
}

/// Fields of an [UploadForm] as read from the request.
#[derive(Debug, Default)]
pub(crate) struct UploadFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,

    /// File name and content of the document.
    pub file: Option<(String, Bytes)>,

    /// File name and content of the thumbnail.
    pub thumbnail: Option<(String, Bytes)>,
}

impl UploadFields {
    /// Read every field of the form. Unknown fields are ignored.
    pub async fn read(mut form: Multipart) -> Result<Self, ShelfError> {
        let mut fields = Self::default();

        while let Some(field) = map_err!(form.next_field().await) {
            let Some(name) = field.name().map(String::from) else {
                continue;
            };

            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    fields.file = Some((file_name, map_err!(field.bytes().await)));
                }
                "thumbnail" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content = map_err!(field.bytes().await);
                    // Browsers send an empty part when no file is selected.
                    if !file_name.is_empty() || !content.is_empty() {
                        fields.thumbnail = Some((file_name, content));
                    }
                }
                "title" => fields.title = Some(map_err!(field.text().await)),
                "author" => fields.author = Some(map_err!(field.text().await)),
                "category" => fields.category = Some(map_err!(field.text().await)),
                "description" => fields.description = Some(map_err!(field.text().await)),
                other => tracing::debug!("Ignoring unknown form field '{other}'"),
            }
        }

        Ok(fields)
    }

    pub fn as_upload(&self) -> DocumentUpload<'_> {
        DocumentUpload {
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            file_name: self.file.as_ref().map(|(name, _)| name.clone()),
            file: self
                .file
                .as_ref()
                .map(|(_, content)| &content[..])
                .unwrap_or_default(),
            thumbnail: self.thumbnail.as_ref().map(|(name, content)| ThumbnailUpload {
                name: name.as_str(),
                file: &content[..],
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub(crate) struct SearchQuery {
    /// Search term, matched case insensitively against title, author, category
    /// and description.
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct BatchDeletePayload {
    /// IDs of the documents to delete.
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct BatchDeleteResult {
    /// Amount of documents actually deleted.
    pub deleted: u64,
}

/// Catalog entry in the shape of the original book listing.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LegacyBook {
    pub book_name: String,

    pub author_name: String,

    /// Download URL of the document.
    pub file_name: String,

    /// Thumbnail URL of the document, if it has one.
    pub cover_photo: Option<String>,
}

impl From<Document> for LegacyBook {
    fn from(document: Document) -> Self {
        Self {
            file_name: format!("/api/download/{}", document.id),
            cover_photo: document
                .thumbnail_ref
                .as_ref()
                .map(|_| format!("/api/thumbnail/{}", document.id)),
            book_name: document.title,
            author_name: document.author,
        }
    }
}
