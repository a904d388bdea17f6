use crate::error::ShelfError;

/// Manipulates documents' file contents.
/// Serves as indirection to decouple the catalog from where the files live.
///
/// All paths are relative to the storage root and have the form `<key>/<name>`,
/// where `key` is the document's storage key.
#[async_trait::async_trait]
pub trait DocumentStore {
    /// Read the contents of the file at `path`.
    /// Errors with `DoesNotExist` if there is no such file.
    ///
    /// * `path`: Relative path of the file.
    async fn read(&self, path: &str) -> Result<Vec<u8>, ShelfError>;

    /// Write `content` to `name` in the directory for `key`, creating the
    /// directory if it is absent. Returns the relative path of the written file.
    ///
    /// * `key`: Document storage key.
    /// * `name`: Sanitized file name.
    /// * `content`: What to write.
    async fn write(&self, key: &str, name: &str, content: &[u8]) -> Result<String, ShelfError>;

    /// Delete the file at `path`. Returns `false` if the file was already gone.
    ///
    /// * `path`: Relative path of the file.
    async fn delete(&self, path: &str) -> Result<bool, ShelfError>;

    /// Remove the directory for `key` if and only if it is empty.
    /// Returns whether the directory was removed.
    ///
    /// * `key`: Document storage key.
    async fn remove_dir_if_empty(&self, key: &str) -> Result<bool, ShelfError>;

    /// Remove the directory for `key` along with everything in it.
    /// Used to discard files of uploads that never got committed.
    ///
    /// * `key`: Document storage key.
    async fn purge(&self, key: &str) -> Result<(), ShelfError>;
}
