use crate::{err, error::ShelfError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Holds document metadata.
/// Main document model for the `documents` table.
#[derive(Debug, Clone, Serialize, Default, sqlx::FromRow, ToSchema)]
pub struct Document {
    /// Primary key. Doubles as the name of the document's storage directory.
    pub id: i64,

    pub title: String,

    pub author: String,

    /// Free text, used for filtering.
    pub category: String,

    pub description: Option<String>,

    /// Sanitized name of the uploaded file, relative to the document's directory.
    pub stored_filename: String,

    /// Thumbnail path relative to the storage root.
    pub thumbnail_ref: Option<String>,

    pub uploaded_at: DateTime<Utc>,

    pub download_count: i64,
}

impl Document {
    /// The name of the directory holding the document's files.
    pub fn storage_key(&self) -> String {
        storage_key(self.id)
    }

    /// Path to the uploaded file, relative to the storage root.
    pub fn file_path(&self) -> String {
        format!("{}/{}", self.storage_key(), self.stored_filename)
    }

    pub fn file_type(&self) -> Result<FileType, ShelfError> {
        FileType::try_from_file_name(&self.stored_filename)
    }
}

/// Derive the storage directory name for a document ID.
pub fn storage_key(id: i64) -> String {
    id.to_string()
}

/// All file types the catalog accepts, both for documents and thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Jpeg,
    Png,
}

impl FileType {
    pub fn try_from_file_name(name: &str) -> Result<Self, ShelfError> {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return err!(InvalidFile, "{name} - missing extension");
        };
        Self::try_from(ext)
    }

    pub fn mime(&self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Jpeg => "image/jpeg",
            FileType::Png => "image/png",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Pdf => write!(f, "pdf"),
            FileType::Jpeg => write!(f, "jpg"),
            FileType::Png => write!(f, "png"),
        }
    }
}

impl TryFrom<&str> for FileType {
    type Error = ShelfError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => err!(InvalidFile, "unsupported file type '{value}'"),
        }
    }
}

/// DTO for inserting.
#[derive(Debug)]
pub struct DocumentInsert<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub category: &'a str,
    pub description: Option<&'a str>,
    pub stored_filename: &'a str,
}

impl<'a> DocumentInsert<'a> {
    pub fn new(title: &'a str, author: &'a str, category: &'a str, stored_filename: &'a str) -> Self {
        Self {
            title,
            author,
            category,
            description: None,
            stored_filename,
        }
    }

    pub fn with_description(mut self, description: Option<&'a str>) -> Self {
        self.description = description;
        self
    }
}

/// DTO for updating. Absent fields are left untouched.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl DocumentUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }
}

/// Aggregated catalog statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentStats {
    /// Total amount of documents.
    pub total: i64,

    /// Amount of documents per category.
    pub per_category: BTreeMap<String, i64>,

    /// Amount of documents per author.
    pub per_author: BTreeMap<String, i64>,

    /// Most downloaded documents, ties broken by ascending ID.
    pub top_downloaded: Vec<Document>,

    /// Most recently uploaded documents, ties broken by ascending ID.
    pub most_recent: Vec<Document>,
}
