//! Error types for georep-fetch.
//!
//! Every fallible step of a transfer returns a [`TransferError`]; the
//! orchestrator folds it into a [`TransferResult`] so nothing escapes
//! [`BlobDownloader::execute`](crate::BlobDownloader::execute).

use std::path::PathBuf;

use thiserror::Error;

use crate::data::{ExtraDetails, FailureKind, TransferResult};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Skipping transfer as this is not a Secondary node")]
    NotSecondary,

    #[error("Skipping transfer as there is no primary node to download from")]
    NoPrimary,

    #[error("Skipping transfer as destination exists and is a directory")]
    DestinationIsDirectory { path: PathBuf },

    #[error("Skipping transfer as we cannot create the destination directory")]
    CreateDestinationDir {
        path:   PathBuf,
        #[source]
        source: georep_fs::Error,
    },

    #[error("Error creating temporary file")]
    TempFile {
        path:   Option<PathBuf>,
        #[source]
        source: georep_fs::Error,
    },

    #[error("Non-success HTTP response status code {status}")]
    HttpStatus {
        status:               u16,
        reason:               String,
        url:                  String,
        primary_missing_file: bool,
    },

    #[error("Error downloading file")]
    Download {
        url:              String,
        bytes_downloaded: u64,
        #[source]
        source:           BoxError,
    },

    #[error("Downloaded file checksum mismatch")]
    ChecksumMismatch {
        expected:         String,
        actual:           String,
        bytes_downloaded: u64,
    },

    #[error("Error replacing destination file")]
    Replace {
        bytes_downloaded: u64,
        #[source]
        source:           BoxError,
    },
}

impl TransferError {
    pub fn download(url: &str, bytes_downloaded: u64, source: impl Into<BoxError>) -> Self {
        Self::Download {
            url: url.to_string(),
            bytes_downloaded,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotSecondary
            | Self::NoPrimary
            | Self::DestinationIsDirectory { .. }
            | Self::CreateDestinationDir { .. } => FailureKind::Precondition,
            Self::TempFile { .. } => FailureKind::TempFile,
            Self::HttpStatus {
                primary_missing_file: true,
                ..
            } => FailureKind::PrimaryMissingFile,
            Self::HttpStatus { .. } | Self::Download { .. } => FailureKind::Transport,
            Self::ChecksumMismatch { .. } => FailureKind::ChecksumMismatch,
            Self::Replace { .. } => FailureKind::Storage,
        }
    }

    pub fn bytes_downloaded(&self) -> u64 {
        match self {
            Self::Download { bytes_downloaded, .. }
            | Self::ChecksumMismatch { bytes_downloaded, .. }
            | Self::Replace { bytes_downloaded, .. } => *bytes_downloaded,
            _ => 0,
        }
    }

    pub fn extra_details(&self) -> ExtraDetails {
        let details = ExtraDetails::new();
        match self {
            Self::NotSecondary | Self::NoPrimary => details,
            Self::DestinationIsDirectory { path } => details.with("absolute_path", path.display().to_string()),
            Self::CreateDestinationDir { path, source } => details
                .with("absolute_path", path.display().to_string())
                .with("error", source.to_string()),
            Self::TempFile { path, source } => {
                let details = details.with("error", source.to_string());
                match path {
                    Some(path) => details.with("absolute_path", path.display().to_string()),
                    None => details,
                }
            }
            Self::HttpStatus {
                status, reason, url, ..
            } => details
                .with("status_code", *status)
                .with("reason", reason.as_str())
                .with("url", url.as_str()),
            Self::Download { url, source, .. } => details
                .with("error", source.to_string())
                .with("url", url.as_str()),
            Self::ChecksumMismatch { expected, actual, .. } => details
                .with("primary_checksum", expected.as_str())
                .with("actual_checksum", actual.as_str()),
            Self::Replace { source, .. } => details.with("error", source.to_string()),
        }
    }
}

impl From<TransferError> for TransferResult {
    fn from(err: TransferError) -> Self {
        TransferResult::failure(err.kind(), err.to_string())
            .with_bytes_downloaded(err.bytes_downloaded())
            .with_extra_details(err.extra_details())
    }
}
