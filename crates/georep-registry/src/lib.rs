//! Container registry tag deletion.
//!
//! Registries that understand tag deletion by name get a single request per
//! tag ([`FastDelete`]). Everything else falls back to [`SlowDelete`]: every
//! tag is re-pointed at a throwaway empty manifest, and that one manifest is
//! then deleted by digest, taking all the tags with it.
//!
//! [`DeleteTagsService`] picks the strategy per call from the feature flags and
//! the client's capability check.

mod client;
mod error;
mod response;
mod service;
mod strategy;

pub use client::RegistryClient;
pub use error::DeleteError;
pub use response::DeleteTagsResponse;
pub use service::DeleteTagsService;
pub use strategy::{DeleteStrategy, FastDelete, SlowDelete, Strategy};
