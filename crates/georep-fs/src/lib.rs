//! Filesystem primitives for replicated blobs.
//!
//! - [`ScopedTempFile`] stages a download next to its destination and is
//!   unlinked on every exit path.
//! - [`replace_file`] promotes staged content over the destination in one rename.
//! - [`ensure_dir`] gives `mkdir -p` semantics for destination parents.

mod dir;
mod error;
mod replace;
mod temp;

pub use dir::{ensure_dir, ensure_parent_dir};
pub use error::{Error, Result};
pub use replace::replace_file;
pub use temp::{ScopedTempFile, TEMP_PREFIX, TempFileOptions};
