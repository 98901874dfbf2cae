use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use georep_config::{FeatureFlags, ReplicationConfig, flags};
use georep_fs::{ScopedTempFile, TEMP_PREFIX, TempFileOptions};
use georep_verify::{ChecksumCheck, Hasher, Sha256Hasher};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::core::is_primary_missing_file;
use crate::data::{TransferRequest, TransferResult, TransferState};
use crate::effects::http::{HttpClient, HttpResponse};
use crate::effects::preconditions::check_preconditions;
use crate::error::TransferError;
use crate::node::{NodeStatus, PrimaryNode};
use crate::replicator::{BlobStorage, HeaderProvider, Replicator};

/// Upper bound on how much of an error response body is read for
/// classification.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Fetches one blob from the primary into local storage.
///
/// Each [`execute`](Self::execute) call runs preconditions, stages the body in
/// a scoped temp file, verifies it, and promotes it to the destination. The
/// temp file is gone when the call returns, whatever the outcome.
///
/// Concurrent calls for *different* resources are independent. Concurrent
/// calls for the *same* destination are not serialized here: both replace the
/// destination and the last writer wins, so schedulers must keep at most one
/// transfer in flight per resource.
pub struct BlobDownloader<C, H> {
    client:  C,
    headers: H,
    node:    NodeStatus,
    flags:   FeatureFlags,
}

impl<C: HttpClient, H: HeaderProvider> BlobDownloader<C, H> {
    pub fn new(client: C, headers: H, node: NodeStatus, flags: FeatureFlags) -> Self {
        Self {
            client,
            headers,
            node,
            flags,
        }
    }

    pub fn from_config(client: C, headers: H, config: &ReplicationConfig) -> Self {
        Self::new(
            client,
            headers,
            NodeStatus::from_config(&config.node),
            config.features.clone(),
        )
    }

    pub fn node(&self) -> &NodeStatus { &self.node }

    /// URL on the primary to download `replicator` from, when a primary is known.
    pub fn resource_url<R: Replicator>(&self, replicator: &R) -> Option<String> {
        self.node
            .primary()
            .map(|primary| primary.retrieve_url(&replicator.transfer_request()))
    }

    /// Download the file to a temp file, then put it where it belongs.
    ///
    /// Never fails: every outcome, including local I/O errors, is reported in
    /// the returned [`TransferResult`].
    #[instrument(
        skip_all,
        fields(
            replicable_name = replicator.replicable_name(),
            model_record_id = replicator.model_record_id(),
        )
    )]
    pub async fn execute<R: Replicator>(&self, replicator: &R) -> TransferResult {
        debug!(state = %TransferState::Idle, "starting transfer");
        let request = replicator.transfer_request();

        let result = match self.transfer(replicator, &request).await {
            Ok(bytes_downloaded) => TransferResult::success(bytes_downloaded),
            Err(err) => TransferResult::from(err),
        };

        match result.reason() {
            None => info!(
                state = %result.state(),
                bytes_downloaded = result.bytes_downloaded(),
                "transfer succeeded"
            ),
            Some(reason) => warn!(
                state = %result.state(),
                reason,
                bytes_downloaded = result.bytes_downloaded(),
                primary_missing_file = result.primary_missing_file(),
                "transfer failed"
            ),
        }

        result
    }

    async fn transfer<R: Replicator>(&self, replicator: &R, request: &TransferRequest) -> Result<u64, TransferError> {
        let primary: &PrimaryNode = check_preconditions(&self.node, replicator)?;
        let temp = open_temp_file(replicator, request)?;

        let url = primary.retrieve_url(request);
        let headers = self.headers.headers(request);
        let outcome = self.download_file(replicator, &url, &headers, &temp).await;

        let temp_path = temp.path().to_path_buf();
        if let Err(err) = temp.close() {
            warn!(path = %temp_path.display(), error = %err, "failed to remove temp file");
        }

        outcome
    }

    async fn download_file<R: Replicator>(
        &self,
        replicator: &R,
        url: &str,
        headers: &[(String, String)],
        temp: &ScopedTempFile,
    ) -> Result<u64, TransferError> {
        let validation_enabled = self.flags.enabled(flags::GEO_FILE_TRANSFER_VALIDATION, true);
        let check = ChecksumCheck::new(replicator.primary_checksum(), validation_enabled);

        debug!(state = %TransferState::RequestSent, url, "requesting blob from primary");
        let response = self
            .client
            .get(url, headers)
            .await
            .map_err(|e| TransferError::download(url, 0, e))?;

        if !response.is_success() {
            return Err(classify_failure(response, url).await);
        }

        debug!(state = %TransferState::Streaming, status = response.status, "streaming response body");
        let mut hasher = check.is_required().then(Sha256Hasher::new);
        let file_size = stream_to_file(response.body, temp, hasher.as_mut(), url).await?;

        if let Some(hasher) = hasher {
            debug!(state = %TransferState::Verifying, "verifying checksum");
            let actual = hasher.finalize_hex();
            if check.is_mismatch(&actual) {
                return Err(TransferError::ChecksumMismatch {
                    expected: check.expected().unwrap_or_default().to_string(),
                    actual,
                    bytes_downloaded: file_size,
                });
            }
        }

        replicator
            .storage()
            .replace_file(temp.path())
            .await
            .map_err(|e| TransferError::Replace {
                bytes_downloaded: file_size,
                source:           Box::new(e),
            })?;

        Ok(file_size)
    }
}

/// Stage next to a file-storage destination so the final move is a rename on
/// one filesystem; object storage stages in its staging directory.
fn open_temp_file<R: Replicator>(replicator: &R, request: &TransferRequest) -> Result<ScopedTempFile, TransferError> {
    let staged = match replicator.storage().absolute_path() {
        Some(path) => {
            let dir = path.parent().unwrap_or(std::path::Path::new("."));
            ScopedTempFile::new_in(dir, &TempFileOptions::new())
        }
        None => {
            let prefix = format!(
                "{}{}-{}",
                TEMP_PREFIX,
                request.replicable_name(),
                request.model_record_id()
            );
            let options = TempFileOptions::new().prefix(prefix);
            match replicator.storage().staging_dir() {
                Some(dir) => ScopedTempFile::new_in(dir, &options),
                None => ScopedTempFile::new(&options),
            }
        }
    };

    staged.map_err(|source| TransferError::TempFile {
        path: replicator.storage().absolute_path().map(|p| p.to_path_buf()),
        source,
    })
}

/// Write every chunk to the temp file, hashing on the way through. Returns the
/// size of the synced file.
async fn stream_to_file<S, E, Hs>(
    mut body: S,
    temp: &ScopedTempFile,
    mut hasher: Option<&mut Hs>,
    url: &str,
) -> Result<u64, TransferError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
    Hs: Hasher,
{
    let std_file = temp
        .try_clone_file()
        .map_err(|e| TransferError::download(url, 0, e))?;
    let mut file = tokio::fs::File::from_std(std_file);
    let mut bytes_written = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| TransferError::download(url, bytes_written, e))?;
        if let Some(h) = hasher.as_deref_mut() {
            h.update(&chunk);
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| TransferError::download(url, bytes_written, e))?;
        bytes_written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| TransferError::download(url, bytes_written, e))?;
    file.sync_all()
        .await
        .map_err(|e| TransferError::download(url, bytes_written, e))?;

    let size = file
        .metadata()
        .await
        .map(|m| m.len())
        .unwrap_or(bytes_written);
    Ok(size)
}

/// Turn a non-success response into a transport failure, reading a bounded
/// prefix of the body to spot the primary's missing-file answer.
async fn classify_failure<E>(response: HttpResponse<E>, url: &str) -> TransferError {
    let HttpResponse {
        status,
        reason,
        content_type,
        mut body,
    } = response;

    let mut prefix = Vec::new();
    while prefix.len() < MAX_ERROR_BODY_BYTES {
        match body.next().await {
            Some(Ok(chunk)) => prefix.extend_from_slice(&chunk),
            _ => break,
        }
    }
    prefix.truncate(MAX_ERROR_BODY_BYTES);

    TransferError::HttpStatus {
        status,
        reason,
        url: url.to_string(),
        primary_missing_file: is_primary_missing_file(status, content_type.as_deref(), &prefix),
    }
}
