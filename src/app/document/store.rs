use crate::{core::document::store::DocumentStore, err, error::ShelfError, map_err};
use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info};

/// Simple FS based implementation of a [DocumentStore].
/// Every document gets a directory under `base` named after its storage key.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    /// The base directory to store the documents in.
    base: PathBuf,
}

impl FsDocumentStore {
    /// Create the store, creating `path` first if it does not exist.
    pub fn new(path: &str) -> Self {
        std::fs::create_dir_all(path).expect("unable to create upload directory");

        let base = PathBuf::from_str(path)
            .expect("invalid path")
            .canonicalize()
            .expect("unable to canonicalize");

        if !base.is_dir() {
            panic!("not a directory: {path}");
        }

        info!("Initialising fs store at {}", base.display());

        Self { base }
    }

    /// Resolve a relative path against the base directory, refusing anything
    /// that is not a plain sequence of names.
    fn resolve(&self, path: &str) -> Result<PathBuf, ShelfError> {
        let relative = Path::new(path);

        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        if path.is_empty() || !is_plain {
            return err!(InvalidFile, "invalid storage path '{path}'");
        }

        Ok(self.base.join(relative))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FsDocumentStore {
    async fn read(&self, path: &str) -> Result<Vec<u8>, ShelfError> {
        let full = self.resolve(path)?;
        debug!("Reading {}", full.display());
        match tokio::fs::read(&full).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => err!(DoesNotExist, "File '{path}'"),
            Err(e) => Err(map_err!(Err(e))),
        }
    }

    async fn write(&self, key: &str, name: &str, content: &[u8]) -> Result<String, ShelfError> {
        let dir = self.resolve(key)?;
        let relative = format!("{key}/{name}");
        let full = self.resolve(&relative)?;

        // Idempotent, concurrent writers into the same directory do not race.
        map_err!(tokio::fs::create_dir_all(&dir).await);

        debug!("Writing {}", full.display());
        map_err!(tokio::fs::write(&full, content).await);

        Ok(relative)
    }

    async fn delete(&self, path: &str) -> Result<bool, ShelfError> {
        let full = self.resolve(path)?;
        debug!("Removing {}", full.display());
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(map_err!(Err(e))),
        }
    }

    async fn remove_dir_if_empty(&self, key: &str) -> Result<bool, ShelfError> {
        let dir = self.resolve(key)?;

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(map_err!(Err(e))),
        };

        if map_err!(entries.next_entry().await).is_some() {
            return Ok(false);
        }

        debug!("Removing directory {}", dir.display());

        // `remove_dir` refuses non-empty directories, a file landing in between
        // the check and the removal is never lost.
        match tokio::fs::remove_dir(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(map_err!(Err(e))),
        }
    }

    async fn purge(&self, key: &str) -> Result<(), ShelfError> {
        let dir = self.resolve(key)?;
        debug!("Purging {}", dir.display());
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_err!(Err(e))),
        }
    }
}
