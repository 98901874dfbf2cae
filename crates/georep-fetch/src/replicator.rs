//! Caller-side collaborators of a transfer.
//!
//! A [`Replicator`] describes one resource type (uploads, LFS objects, ...)
//! and where its bytes live; a [`HeaderProvider`] proves the secondary's
//! identity to the primary.

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::data::TransferRequest;

/// Where replicated content ends up.
pub trait BlobStorage: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Destination on local disk, `None` for object storage.
    fn absolute_path(&self) -> Option<&Path>;

    fn is_file_storage(&self) -> bool { self.absolute_path().is_some() }

    /// Directory to stage downloads in when there is no local destination.
    /// `None` uses the system temp directory.
    fn staging_dir(&self) -> Option<&Path> { None }

    /// Replace destination content with the verified file at `source`.
    ///
    /// Implementations may move `source` away; the caller unlinks whatever is
    /// left behind.
    fn replace_file(&self, source: &Path) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Storage backed by a single path on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }
}

impl BlobStorage for FileStorage {
    type Error = georep_fs::Error;

    fn absolute_path(&self) -> Option<&Path> { Some(&self.path) }

    async fn replace_file(&self, source: &Path) -> Result<(), Self::Error> {
        let source = source.to_path_buf();
        let dest = self.path.clone();
        tokio::task::spawn_blocking(move || georep_fs::replace_file(source, dest))
            .await
            .map_err(|e| georep_fs::Error::Io(std::io::Error::other(e)))?
    }
}

/// One replicable record as seen by the downloader.
pub trait Replicator: Send + Sync {
    type Storage: BlobStorage;

    fn replicable_name(&self) -> &str;

    fn model_record_id(&self) -> u64;

    /// SHA-256 hex digest declared by the primary, if it computed one.
    fn primary_checksum(&self) -> Option<&str>;

    fn storage(&self) -> &Self::Storage;

    fn transfer_request(&self) -> TransferRequest {
        TransferRequest::new(self.replicable_name(), self.model_record_id())
    }
}

/// Supplies authenticated request headers for a transfer. Opaque to the
/// downloader; computed once per attempt.
pub trait HeaderProvider: Send + Sync {
    fn headers(&self, request: &TransferRequest) -> Vec<(String, String)>;
}

impl<F> HeaderProvider for F
where
    F: Fn(&TransferRequest) -> Vec<(String, String)> + Send + Sync,
{
    fn headers(&self, request: &TransferRequest) -> Vec<(String, String)> { self(request) }
}

/// The same headers for every request.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(Vec<(String, String)>);

impl StaticHeaders {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }
}

impl HeaderProvider for StaticHeaders {
    fn headers(&self, _request: &TransferRequest) -> Vec<(String, String)> { self.0.clone() }
}
