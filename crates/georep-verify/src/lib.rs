//! Checksum primitives for replicated blobs.
//!
//! Hashing is incremental so a downloader can digest bytes as they stream to
//! disk. Deciding whether a digest has to be compared at all is the job of
//! [`ChecksumCheck`].
//!
//! # Example
//!
//! ```
//! use georep_verify::{ChecksumCheck, Hasher, Sha256Hasher};
//!
//! let mut hasher = Sha256Hasher::new();
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//! let actual = hasher.finalize_hex();
//!
//! let check = ChecksumCheck::new(Some(actual.as_str()), true);
//! assert!(!check.is_mismatch(&actual));
//! ```

pub use self::checksum::{ChecksumCheck, checksum_mismatch};
pub use self::hasher::{Hasher, Sha256Hasher};

mod checksum;
mod hasher;
