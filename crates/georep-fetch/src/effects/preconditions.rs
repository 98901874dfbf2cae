use tracing::error;

use crate::error::TransferError;
use crate::node::{NodeStatus, PrimaryNode};
use crate::replicator::{BlobStorage, Replicator};

/// Fail fast before any network call. Checks run in order and the first
/// failure wins; on success the primary to download from is returned.
pub(crate) fn check_preconditions<'n, R: Replicator>(
    node: &'n NodeStatus,
    replicator: &R,
) -> Result<&'n PrimaryNode, TransferError> {
    if !node.is_secondary() {
        return Err(TransferError::NotSecondary);
    }

    let primary = node.primary().ok_or(TransferError::NoPrimary)?;

    if let Some(path) = replicator.storage().absolute_path() {
        if path.is_dir() {
            return Err(TransferError::DestinationIsDirectory {
                path: path.to_path_buf(),
            });
        }

        if let Err(source) = georep_fs::ensure_parent_dir(path) {
            error!(path = %path.display(), error = %source, "unable to create destination directory");
            return Err(TransferError::CreateDestinationDir {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    Ok(primary)
}
