use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::RegistryClient;
use crate::error::DeleteError;

/// One way of removing tags from a repository.
///
/// Returns the names of the tags that are gone, in request order. A tag the
/// registry refused, or failed to answer for, is simply left out.
pub trait DeleteStrategy: Send + Sync {
    fn delete<C: RegistryClient>(
        &self,
        client: &C,
        path: &str,
        tags: &[String],
    ) -> impl Future<Output = Result<Vec<String>, DeleteError>> + Send;
}

/// Delete each tag by name. Only registries reporting
/// [`supports_tag_delete`](RegistryClient::supports_tag_delete) accept this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FastDelete {
    timeout: Option<Duration>,
}

impl FastDelete {
    pub fn new() -> Self { Self::default() }

    /// Bound the whole batch; running out yields [`DeleteError::Timeout`].
    pub fn with_timeout(timeout: Duration) -> Self { Self { timeout: Some(timeout) } }

    pub fn timeout(&self) -> Option<Duration> { self.timeout }
}

impl DeleteStrategy for FastDelete {
    async fn delete<C: RegistryClient>(
        &self,
        client: &C,
        path: &str,
        tags: &[String],
    ) -> Result<Vec<String>, DeleteError> {
        let batch = delete_each_by_name(client, path, tags);
        let deleted = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, batch)
                .await
                .map_err(|_| DeleteError::Timeout { tags_count: tags.len() })?,
            None => batch.await,
        };

        if deleted.is_empty() {
            return Err(DeleteError::NotDeleted);
        }
        Ok(deleted)
    }
}

async fn delete_each_by_name<C: RegistryClient>(client: &C, path: &str, tags: &[String]) -> Vec<String> {
    let mut deleted = Vec::with_capacity(tags.len());
    for tag in tags {
        match client.delete_tag_by_name(path, tag).await {
            Ok(true) => deleted.push(tag.clone()),
            Ok(false) => debug!(tag = %tag, "registry refused tag delete"),
            Err(err) => warn!(tag = %tag, error = %err, "tag delete failed"),
        }
    }
    deleted
}

/// Re-point every tag at an empty manifest, then delete that manifest.
///
/// Works against any registry that supports manifest deletion by digest.
/// Images the tags pointed at before are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlowDelete;

impl DeleteStrategy for SlowDelete {
    async fn delete<C: RegistryClient>(
        &self,
        client: &C,
        path: &str,
        tags: &[String],
    ) -> Result<Vec<String>, DeleteError> {
        let manifest = match client.generate_empty_manifest(path).await {
            Ok(Some(manifest)) => manifest,
            Ok(None) => return Err(DeleteError::NoManifest),
            Err(err) => {
                warn!(error = %err, "failed to generate empty manifest");
                return Err(DeleteError::NoManifest);
            }
        };

        let mut replaced: Vec<(String, String)> = Vec::with_capacity(tags.len());
        for tag in tags {
            match client.put_tag(path, tag, &manifest).await {
                Ok(Some(digest)) => replaced.push((tag.clone(), digest)),
                Ok(None) => debug!(tag = %tag, "registry did not return a digest"),
                Err(err) => warn!(tag = %tag, error = %err, "failed to replace tag manifest"),
            }
        }

        let digests: BTreeSet<&str> = replaced.iter().map(|(_, d)| d.as_str()).collect();
        if digests.len() > 1 {
            warn!(digests = ?digests, "multiple tag digests for the same empty manifest");
        }

        let Some(digest) = replaced.first().map(|(_, d)| d.clone()) else {
            return Err(DeleteError::NotDeleted);
        };

        match client.delete_tag_by_digest(path, &digest).await {
            Ok(true) => Ok(replaced.into_iter().map(|(tag, _)| tag).collect()),
            Ok(false) => Err(DeleteError::NotDeleted),
            Err(err) => {
                warn!(digest = %digest, error = %err, "failed to delete empty manifest");
                Err(DeleteError::NotDeleted)
            }
        }
    }
}

/// The strategy chosen for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Fast(FastDelete),
    Slow(SlowDelete),
}

impl DeleteStrategy for Strategy {
    async fn delete<C: RegistryClient>(
        &self,
        client: &C,
        path: &str,
        tags: &[String],
    ) -> Result<Vec<String>, DeleteError> {
        match self {
            Self::Fast(fast) => fast.delete(client, path, tags).await,
            Self::Slow(slow) => slow.delete(client, path, tags).await,
        }
    }
}
