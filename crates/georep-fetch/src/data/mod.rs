//! Immutable data types for blob transfers.
//!
//! These types are built once per attempt and handed across the crate
//! boundary unchanged.

mod request;
mod result;
mod state;

pub use request::TransferRequest;
pub use result::{ExtraDetails, FailureKind, TransferResult};
pub use state::TransferState;
