use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create temporary file in {dir}: {source}")]
    TempFile {
        dir:    PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace {dest} with {src}: {source}")]
    Replace {
        src:    PathBuf,
        dest:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is a directory")]
    IsDirectory(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
