//! Pure decisions for blob transfers: no I/O happens here.

mod classify;
mod retry;

pub use classify::{FILE_NOT_FOUND_GEO_CODE, is_primary_missing_file, is_success};
pub use retry::retry_delay;
