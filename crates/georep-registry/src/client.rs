use std::future::Future;

/// Registry API surface needed to delete tags.
///
/// Methods answering `bool` or `Option` report a negative registry answer;
/// `Err` is reserved for failures to reach the registry at all.
pub trait RegistryClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;
    /// Manifest pushed as a stand-in during slow deletion.
    type Manifest: Send + Sync;

    /// Whether the registry deletes tags by name.
    fn supports_tag_delete(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    fn delete_tag_by_name(&self, path: &str, tag: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Upload the blobs of an empty image and build its manifest.
    fn generate_empty_manifest(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Option<Self::Manifest>, Self::Error>> + Send;

    /// Point `tag` at `manifest`, returning the resulting manifest digest.
    fn put_tag(
        &self,
        path: &str,
        tag: &str,
        manifest: &Self::Manifest,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    fn delete_tag_by_digest(&self, path: &str, digest: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
