//! Secondary-to-primary blob fetching with integrity verification.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable request/result types
//! - `core` - Pure decisions (response classification, retry backoff)
//! - `effects` - I/O operations behind the [`HttpClient`] abstraction
//!
//! # Key Features
//!
//! - **Single-Pass**: the body is hashed while it streams to disk
//! - **Atomic Placement**: staged next to the destination, promoted by rename
//! - **Scoped Cleanup**: the staging file is unlinked on every exit path
//! - **No Policy**: retries and scheduling belong to the caller; every outcome
//!   is a [`TransferResult`]

mod core;
pub mod data;
mod effects;
mod error;
mod node;
mod replicator;

pub use self::core::{FILE_NOT_FOUND_GEO_CODE, is_primary_missing_file, retry_delay};
pub use data::{ExtraDetails, FailureKind, TransferRequest, TransferResult, TransferState};
pub use effects::{BlobDownloader, BoxStream, HttpClient, HttpResponse};
pub use error::{BoxError, TransferError};
pub use node::{NodeStatus, PrimaryNode};
pub use replicator::{BlobStorage, FileStorage, HeaderProvider, Replicator, StaticHeaders};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
