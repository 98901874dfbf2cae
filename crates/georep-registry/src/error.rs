use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteError {
    #[error("not tags specified")]
    NoTags,

    #[error("could not delete tags")]
    NotDeleted,

    #[error("could not generate manifest")]
    NoManifest,

    #[error("Timeout while deleting tags")]
    Timeout { tags_count: usize },
}
